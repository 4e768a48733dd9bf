//! Deployment request models

use std::collections::BTreeMap;

use secrecy::SecretString;

use crate::deploy::definition::TemplateSource;
use crate::models::stack::EndpointId;

/// Template variable bindings, keyed by placeholder name
pub type TemplateVariables = BTreeMap<String, String>;

/// Portainer login credentials
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// A single deployment invocation
#[derive(Debug)]
pub struct DeployRequest {
    /// Portainer base URL, e.g. `https://portainer.example.com`
    pub host: String,

    /// Portainer login credentials
    pub credentials: Credentials,

    /// Environment the stack is created in when it does not exist yet
    pub endpoint_id: EndpointId,

    /// Name of the stack to create or update
    pub stack_name: String,

    /// Swarm cluster id; selects a swarm stack on creation
    pub swarm_id: Option<String>,

    /// Stack definition template
    pub template_source: Option<Box<dyn TemplateSource>>,

    /// Bindings for `{{key}}` placeholders in the template
    pub template_variables: Option<TemplateVariables>,

    /// Image reference injected into the definition
    pub image: Option<String>,

    /// Remove services no longer in the definition on update
    pub prune: bool,

    /// Re-pull images on update
    pub pull_image: bool,
}

impl DeployRequest {
    pub fn new(
        host: impl Into<String>,
        credentials: Credentials,
        endpoint_id: EndpointId,
        stack_name: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            credentials,
            endpoint_id,
            stack_name: stack_name.into(),
            swarm_id: None,
            template_source: None,
            template_variables: None,
            image: None,
            prune: false,
            pull_image: false,
        }
    }
}
