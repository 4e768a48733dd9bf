//! Error types for the stack deployer

use thiserror::Error;

/// Main error type for the stack deployer
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Could not find stack-definition file: {0}")]
    SourceNotFound(String),

    #[error("Stack with name {0} does not exist and no stack definition file was provided.")]
    MissingDefinition(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
