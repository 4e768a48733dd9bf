//! Portainer authentication API

use openapi_client::models::{AuthenticateRequest, AuthenticateResponse};
use reqwest::header;
use secrecy::ExposeSecret;
use tracing::{debug, error};

use crate::authn::session::Session;
use crate::errors::DeployError;
use crate::http::client::HttpClient;
use crate::models::request::Credentials;

impl HttpClient {
    /// Log in and obtain a session
    ///
    /// Any failure, including an unreachable host, is reported as an
    /// authentication error.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, DeployError> {
        let url = self.url("/auth");
        debug!("POST {} (login)", url);

        let body = AuthenticateRequest {
            username: credentials.username.clone(),
            password: credentials.password.expose_secret().to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeployError::AuthError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Login failed: {} - {}", status, body);
            return Err(DeployError::AuthError(format!("{}: {}", status, body)));
        }

        let body: AuthenticateResponse = response
            .json()
            .await
            .map_err(|e| DeployError::AuthError(e.to_string()))?;
        Ok(Session::new(body.jwt))
    }

    /// Invalidate a session, waiting at most the logout timeout
    pub async fn logout(&self, session: &Session) -> Result<(), DeployError> {
        let url = self.url("/auth/logout");
        debug!("POST {} (logout)", url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, session.bearer())
            .timeout(self.logout_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DeployError::ApiError(response.status().to_string()));
        }

        Ok(())
    }
}
