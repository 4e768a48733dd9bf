//! Session-scoped Portainer operations used by the orchestrator

use async_trait::async_trait;
use tracing::warn;

use crate::authn::session::Session;
use crate::errors::DeployError;
use crate::http::client::HttpClient;
use crate::models::request::Credentials;
use crate::models::stack::{NewStack, RemoteStack, StackUpdate};

/// Portainer client trait for testability
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Log in and obtain a session
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, DeployError>;

    /// End a session. Best effort: failures are logged, never returned.
    async fn deauthenticate(&self, session: Session);

    /// List all stacks
    async fn list_stacks(&self, session: &Session) -> Result<Vec<RemoteStack>, DeployError>;

    /// Create a new stack
    async fn create_stack(&self, session: &Session, stack: &NewStack<'_>) -> Result<(), DeployError>;

    /// Update an existing stack
    async fn update_stack(&self, session: &Session, update: &StackUpdate<'_>) -> Result<(), DeployError>;
}

#[async_trait]
impl SessionClient for HttpClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, DeployError> {
        self.login(credentials).await
    }

    async fn deauthenticate(&self, session: Session) {
        if let Err(e) = self.logout(&session).await {
            warn!("Logout failed: {}", e);
        }
    }

    async fn list_stacks(&self, session: &Session) -> Result<Vec<RemoteStack>, DeployError> {
        HttpClient::list_stacks(self, session).await
    }

    async fn create_stack(&self, session: &Session, stack: &NewStack<'_>) -> Result<(), DeployError> {
        HttpClient::create_stack(self, session, stack).await
    }

    async fn update_stack(&self, session: &Session, update: &StackUpdate<'_>) -> Result<(), DeployError> {
        HttpClient::update_stack(self, session, update).await
    }
}
