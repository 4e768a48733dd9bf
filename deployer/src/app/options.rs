//! Application configuration options

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use serde_json::Value;

use crate::errors::DeployError;
use crate::filesys::file::File;
use crate::logs::{LogLevel, LogOptions};
use crate::models::request::{Credentials, DeployRequest, TemplateVariables};
use crate::models::stack::EndpointId;

/// Command line arguments, each also readable from the environment
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Portainer base URL, e.g. https://portainer.example.com
    #[arg(long, env = "PORTAINER_HOST")]
    pub portainer_host: String,

    /// Portainer username
    #[arg(long, env = "PORTAINER_USERNAME")]
    pub username: String,

    /// Portainer password
    #[arg(long, env = "PORTAINER_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Swarm cluster id; when set, new stacks are swarm stacks
    #[arg(long, env = "SWARM_ID")]
    pub swarm_id: Option<String>,

    /// Environment (endpoint) id new stacks are created in
    #[arg(long, env = "ENDPOINT_ID")]
    pub endpoint_id: EndpointId,

    /// Name of the stack to create or update
    #[arg(long, env = "STACK_NAME")]
    pub stack_name: String,

    /// Stack definition file, relative to the workspace
    #[arg(long, env = "STACK_DEFINITION")]
    pub stack_definition: Option<PathBuf>,

    /// JSON object of template variables
    #[arg(long, env = "TEMPLATE_VARIABLES")]
    pub template_variables: Option<String>,

    /// Image reference (name:tag) to put into the stack definition
    #[arg(long, env = "IMAGE")]
    pub image: Option<String>,

    /// Prune services that are no longer referenced on update
    #[arg(long, env = "PRUNE_STACK", action = ArgAction::Set, default_value_t = false,
          value_parser = BoolishValueParser::new())]
    pub prune_stack: bool,

    /// Pull images again on update
    #[arg(long, env = "PULL_IMAGE", action = ArgAction::Set, default_value_t = false,
          value_parser = BoolishValueParser::new())]
    pub pull_image: bool,

    /// Workspace root the stack definition path is relative to
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// Log level, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Timeout for Portainer API requests, in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Timeout for the logout request, in seconds
    #[arg(long, default_value_t = 5)]
    pub logout_timeout_secs: u64,
}

impl Args {
    /// Ambient options: logging and HTTP client
    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            log: LogOptions {
                log_level: self.log_level,
                json_format: self.log_json,
            },
            client: ClientOptions {
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                logout_timeout: Duration::from_secs(self.logout_timeout_secs),
            },
        }
    }

    /// Build the deployment request
    pub fn to_request(&self) -> Result<DeployRequest, DeployError> {
        let mut request = DeployRequest::new(
            self.portainer_host.clone(),
            Credentials::new(self.username.clone(), self.password.clone()),
            self.endpoint_id,
            self.stack_name.clone(),
        );

        request.swarm_id = non_blank(self.swarm_id.as_deref());
        request.image = non_blank(self.image.as_deref());
        request.prune = self.prune_stack;
        request.pull_image = self.pull_image;

        if let Some(path) = self.stack_definition.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            request.template_source = Some(Box::new(File::in_workspace(&self.workspace, path)));
        }

        if let Some(raw) = non_blank(self.template_variables.as_deref()) {
            request.template_variables = Some(parse_template_variables(&raw)?);
        }

        Ok(request)
    }
}

/// Main application options
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Logging configuration
    pub log: LogOptions,

    /// Portainer client configuration
    pub client: ClientOptions,
}

/// Portainer HTTP client options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Timeout for every API request
    pub request_timeout: Duration,

    /// Bounded wait for the logout request
    pub logout_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            logout_timeout: Duration::from_secs(5),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a JSON object of template variables
///
/// Scalars are rendered as their JSON text, `null` as an empty string.
pub fn parse_template_variables(raw: &str) -> Result<TemplateVariables, DeployError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| DeployError::ConfigError(format!("Invalid template variables: {}", e)))?;

    let Value::Object(map) = value else {
        return Err(DeployError::ConfigError(
            "Template variables must be a JSON object".to_string(),
        ));
    };

    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(DeployError::ConfigError(format!(
                        "Template variable {} must be a scalar",
                        key
                    )));
                }
            };
            Ok((key, value))
        })
        .collect()
}
