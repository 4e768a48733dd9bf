//! Stack deployment orchestrator
//!
//! Renders the definition, logs in, then either updates the stack with the
//! requested name or creates it. The session is released on every path out
//! of the logged-in section, and the first error is returned unchanged.

use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::authn::session::Session;
use crate::deploy::definition::generate_definition;
use crate::deploy::fsm::{DeployEvent, DeployFsm, DeployState};
use crate::deploy::resolver::resolve_stack;
use crate::errors::DeployError;
use crate::models::request::DeployRequest;
use crate::models::stack::{NewStack, StackId, StackKind, StackUpdate, CREATE_METHOD_STRING};
use crate::portainer::SessionClient;

/// What a successful deployment did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    Created,
    Updated,
}

/// Result of a successful deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub action: DeployAction,
    pub stack_name: String,

    /// Id of the updated stack; unknown for a creation
    pub stack_id: Option<StackId>,
}

/// Deployment orchestrator
///
/// Runs one deployment at a time; the state reflects the latest run.
pub struct DeployOrchestrator<C: SessionClient> {
    client: C,
    fsm: RwLock<DeployFsm>,
}

impl<C: SessionClient> DeployOrchestrator<C> {
    /// Create a new orchestrator around a Portainer client
    pub fn new(client: C) -> Self {
        Self {
            client,
            fsm: RwLock::new(DeployFsm::new()),
        }
    }

    /// Get the client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Get the current deployment state
    pub async fn state(&self) -> DeployState {
        self.fsm.read().await.state()
    }

    /// Get the recorded failure, if any
    pub async fn error(&self) -> Option<String> {
        self.fsm.read().await.error().map(str::to_string)
    }

    async fn transition(&self, event: DeployEvent) -> Result<(), DeployError> {
        let mut fsm = self.fsm.write().await;
        fsm.process(event).map_err(DeployError::Internal)?;
        debug!("Deployment state: {:?}", fsm.state());
        Ok(())
    }

    async fn record_failure(&self, err: &DeployError) {
        if let Err(e) = self.transition(DeployEvent::Fail(err.to_string())).await {
            error!("Unable to record deployment failure: {}", e);
        }
    }

    /// Deploy the stack described by `request`
    pub async fn deploy(&self, request: &DeployRequest) -> Result<DeployOutcome, DeployError> {
        *self.fsm.write().await = DeployFsm::new();

        let definition = match generate_definition(
            request.template_source.as_deref(),
            request.template_variables.as_ref(),
            request.image.as_deref(),
        )
        .await
        {
            Ok(definition) => definition,
            Err(e) => {
                self.record_failure(&e).await;
                return Err(e);
            }
        };
        if let Some(definition) = &definition {
            debug!("{}", definition);
        }
        self.transition(DeployEvent::Rendered).await?;

        info!("Logging in to Portainer instance...");
        let session = match self.client.authenticate(&request.credentials).await {
            Ok(session) => session,
            Err(e) => {
                self.record_failure(&e).await;
                return Err(e);
            }
        };

        let result = self.deploy_in_session(&session, request, definition.as_deref()).await;
        if let Err(e) = &result {
            info!("Something went wrong during deployment!");
            self.record_failure(e).await;
        }

        info!("Logging out from Portainer instance...");
        self.client.deauthenticate(session).await;
        let released = self.transition(DeployEvent::Released).await;

        let outcome = result?;
        released?;
        Ok(outcome)
    }

    /// Everything that needs a session: list, resolve, then create or update
    async fn deploy_in_session(
        &self,
        session: &Session,
        request: &DeployRequest,
        definition: Option<&str>,
    ) -> Result<DeployOutcome, DeployError> {
        self.transition(DeployEvent::Authenticated).await?;

        let stacks = self.client.list_stacks(session).await?;
        self.transition(DeployEvent::Listed).await?;

        if let Some(existing) = resolve_stack(&stacks, &request.stack_name) {
            info!("Found existing stack with name: {}", request.stack_name);
            self.transition(DeployEvent::ExistingStackFound).await?;

            info!("Updating existing stack...");
            let update = StackUpdate {
                stack_id: existing.id,
                endpoint_id: existing.endpoint_id,
                env: existing.env.as_deref(),
                definition,
                prune: request.prune,
                pull_image: request.pull_image,
            };
            self.client.update_stack(session, &update).await?;
            self.transition(DeployEvent::Deployed).await?;
            info!("Successfully updated existing stack");

            return Ok(DeployOutcome {
                action: DeployAction::Updated,
                stack_name: request.stack_name.clone(),
                stack_id: Some(existing.id),
            });
        }

        let Some(definition) = definition else {
            return Err(DeployError::MissingDefinition(request.stack_name.clone()));
        };
        self.transition(DeployEvent::NoExistingStack).await?;

        info!("Deploying new stack...");
        let swarm_id = request.swarm_id.as_deref();
        let stack = NewStack {
            kind: StackKind::for_swarm_id(swarm_id),
            method: CREATE_METHOD_STRING,
            endpoint_id: request.endpoint_id,
            name: &request.stack_name,
            definition,
            swarm_id,
        };
        self.client.create_stack(session, &stack).await?;
        self.transition(DeployEvent::Deployed).await?;
        info!("Successfully created new stack with name: {}", request.stack_name);

        Ok(DeployOutcome {
            action: DeployAction::Created,
            stack_name: request.stack_name.clone(),
            stack_id: None,
        })
    }
}
