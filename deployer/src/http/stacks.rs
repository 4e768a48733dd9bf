//! Stacks API client

use openapi_client::models::{
    CreateStackBody, CreateStackParams, StackData, UpdateStackBody, UpdateStackParams,
};

use crate::authn::session::Session;
use crate::errors::DeployError;
use crate::http::client::HttpClient;
use crate::models::stack::{NewStack, RemoteStack, StackUpdate};

impl HttpClient {
    /// List every stack visible to the session
    pub async fn list_stacks(&self, session: &Session) -> Result<Vec<RemoteStack>, DeployError> {
        let stacks: Vec<StackData> = self.get("/stacks", session).await?;
        Ok(stacks.into_iter().map(RemoteStack::from).collect())
    }

    /// Create a stack from an inline definition
    pub async fn create_stack(&self, session: &Session, stack: &NewStack<'_>) -> Result<(), DeployError> {
        let path = format!("/stacks/create/{}/{}", stack.kind.path_segment(), stack.method);
        let params = CreateStackParams {
            stack_type: stack.kind.api_type(),
            method: stack.method.to_string(),
            endpoint_id: stack.endpoint_id,
        };
        let body = CreateStackBody {
            from_app_template: false,
            name: stack.name.to_string(),
            stack_file_content: stack.definition.to_string(),
            swarm_id: stack.swarm_id.map(str::to_string),
        };
        self.post(&path, session, &params, &body).await
    }

    /// Update an existing stack
    pub async fn update_stack(&self, session: &Session, update: &StackUpdate<'_>) -> Result<(), DeployError> {
        let path = format!("/stacks/{}", update.stack_id);
        let params = UpdateStackParams {
            endpoint_id: update.endpoint_id,
        };
        let body = UpdateStackBody {
            env: update.env.map(|env| env.to_vec()),
            stack_file_content: update.definition.map(str::to_string),
            prune: update.prune,
            pull_image: update.pull_image,
        };
        self.put(&path, session, &params, &body).await
    }
}
