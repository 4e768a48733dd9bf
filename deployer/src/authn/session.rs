//! Authenticated Portainer session

use secrecy::{ExposeSecret, SecretString};

/// Bearer credential obtained from `POST /api/auth`
///
/// Lives for one deployment and is passed explicitly to every call that
/// needs it. Nothing on the HTTP client holds it.
#[derive(Debug)]
pub struct Session {
    token: SecretString,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}
