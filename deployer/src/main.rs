//! Portainer stack deployer - Entry Point
//!
//! Creates or updates a single Portainer stack from a stack definition
//! template and exits non-zero when the deployment fails.

use clap::Parser;
use tracing::info;

use portainer_deployer::app::options::Args;
use portainer_deployer::app::run::run;
use portainer_deployer::deploy::orchestrator::DeployAction;
use portainer_deployer::logs::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let options = args.app_options();

    // Initialize logging
    if let Err(e) = init_logging(options.log.clone()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let request = args.to_request()?;
    let outcome = run(&options, request).await?;
    match outcome.action {
        DeployAction::Created => info!("Stack {} created", outcome.stack_name),
        DeployAction::Updated => info!("Stack {} updated", outcome.stack_name),
    }
    Ok(())
}
