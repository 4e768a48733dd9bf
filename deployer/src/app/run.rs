//! Deployment entry point

use tracing::info;

use crate::app::options::AppOptions;
use crate::deploy::orchestrator::{DeployOrchestrator, DeployOutcome};
use crate::errors::DeployError;
use crate::http::client::HttpClient;
use crate::models::request::DeployRequest;

/// Run one deployment against the Portainer instance named in `request`
pub async fn run(options: &AppOptions, request: DeployRequest) -> Result<DeployOutcome, DeployError> {
    info!(
        "Deploying stack {} to endpoint {} on {}",
        request.stack_name, request.endpoint_id, request.host
    );

    let client = HttpClient::new(&request.host, &options.client)?;
    let orchestrator = DeployOrchestrator::new(client);
    orchestrator.deploy(&request).await
}
