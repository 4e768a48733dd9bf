//! Stack definition rendering
//!
//! A definition is produced from a template in two passes: the template is
//! rendered with Handlebars against the template variables, then the first
//! line naming the target image gets its tag replaced.

use std::fmt;
use std::sync::LazyLock;

use async_trait::async_trait;
use handlebars::Handlebars;
use regex::{NoExpand, Regex};
use tracing::info;

use crate::errors::DeployError;
use crate::models::request::TemplateVariables;

/// Plain `{{name}}` lookups, the only placeholders that may stay unresolved
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][\w.\-]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Where a stack definition template is read from
#[async_trait]
pub trait TemplateSource: Send + Sync + fmt::Debug {
    /// Human readable location, used in logs and errors
    fn location(&self) -> String;

    /// Read the whole template. Fails with `SourceNotFound` when unreadable.
    async fn read(&self) -> Result<String, DeployError>;
}

/// Escape the `{{name}}` lookups that `variables` does not bind
///
/// Handlebars prints `\{{name}}` literally, so these reach the output as
/// written instead of rendering empty.
fn protect_unbound(template: &str, variables: &TemplateVariables) -> String {
    let mut protected = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let whole = &caps[0];
        let start = caps.get(0).map_or(0, |m| m.start());
        let key = &caps[1];

        // Triple-stash, already escaped, and `{{else}}` belong to Handlebars
        let before = &template[..start];
        let reserved = before.ends_with('{') || before.ends_with('\\') || key == "else";
        if reserved || variables.contains_key(key) {
            continue;
        }

        protected.push_str(&template[last..start]);
        protected.push('\\');
        protected.push_str(whole);
        last = start + whole.len();
    }

    protected.push_str(&template[last..]);
    protected
}

/// Render `template` with Handlebars; unbound `{{name}}` lookups are left as is
///
/// Values are HTML-escaped as Handlebars does by default, `{{{name}}}`
/// inserts them raw.
pub fn substitute_variables(template: &str, variables: &TemplateVariables) -> Result<String, DeployError> {
    let handlebars = Handlebars::new();
    handlebars
        .render_template(&protect_unbound(template, variables), variables)
        .map_err(|e| DeployError::TemplateError(e.to_string()))
}

/// Name part of an image reference: everything before the first `:`
///
/// A reference without a tag yields an empty name.
pub fn image_name(image: &str) -> &str {
    match image.split_once(':') {
        Some((name, _)) => name,
        None => "",
    }
}

/// Replace the first `<name>(:<tag>)?\n` in `definition` with `<image>\n`
///
/// Only one occurrence is replaced and the match must end with a newline.
/// The tag never spans a line terminator, so `\r\n` lines do not match.
/// Without a match the definition is returned unchanged.
pub fn inject_image(definition: &str, image: &str) -> Result<String, DeployError> {
    let pattern = format!(
        r"{}(:[^\r\n\x{{2028}}\x{{2029}}]*)?\n",
        regex::escape(image_name(image))
    );
    let re = Regex::new(&pattern).map_err(|e| DeployError::TemplateError(e.to_string()))?;

    let replacement = format!("{}\n", image);
    Ok(re.replacen(definition, 1, NoExpand(&replacement)).into_owned())
}

/// Render a definition from template text
pub fn render_definition(
    template: &str,
    variables: Option<&TemplateVariables>,
    image: Option<&str>,
) -> Result<String, DeployError> {
    let definition = match variables {
        Some(variables) => {
            let keys: Vec<&str> = variables.keys().map(String::as_str).collect();
            info!("Applying template variables for keys: {}", keys.join(","));
            substitute_variables(template, variables)?
        }
        None => template.to_string(),
    };

    match image {
        Some(image) => {
            info!("Inserting image {} into the stack definition", image);
            inject_image(&definition, image)
        }
        None => {
            info!("No new image provided. Will use image in stack definition.");
            Ok(definition)
        }
    }
}

/// Read and render the definition to deploy
///
/// Returns `None` when there is no template, meaning the stack definition
/// should be left as it is.
pub async fn generate_definition(
    source: Option<&dyn TemplateSource>,
    variables: Option<&TemplateVariables>,
    image: Option<&str>,
) -> Result<Option<String>, DeployError> {
    let Some(source) = source else {
        info!("No stack definition file provided. Will not update stack definition.");
        return Ok(None);
    };

    info!("Reading stack definition file from {}", source.location());
    let template = source.read().await?;
    if template.is_empty() {
        return Err(DeployError::SourceNotFound(source.location()));
    }

    render_definition(&template, variables, image).map(Some)
}
