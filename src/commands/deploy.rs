// ABOUTME: Deploy and plan command implementations.
// ABOUTME: Runs the orchestrator against the Azure CLI provider, or prints a dry-run plan.

use funcship::cloud::AzureCli;
use funcship::config::DeploymentConfig;
use funcship::deploy::{CancelFlag, DeployFailure, DeploymentPlan, Orchestrator, StepName};
use funcship::error::{Error, Result};
use funcship::output::Output;

/// Run the full deployment and print its summary.
pub async fn deploy(config: DeploymentConfig, mut output: Output) -> Result<()> {
    output.start_timer();
    output.progress(&format!(
        "Deploying {} to {} ({})",
        config.function_app, config.resource_group, config.location
    ));

    let provider = AzureCli::default();
    let cancel = CancelFlag::new();
    cancel.cancel_on_ctrl_c();

    let result = Orchestrator::new(&provider)
        .with_cancel(cancel)
        .run(&config)
        .await;

    output.summary(&result);

    match result.failure {
        Some(failure) => Err(Error::Deploy(failure)),
        None => Ok(()),
    }
}

/// Print what `deploy` would do, without contacting the provider.
pub fn plan(config: DeploymentConfig, output: Output) -> Result<()> {
    let plan = DeploymentPlan::build(&config)
        .map_err(|e| Error::Deploy(DeployFailure::new(StepName::UploadArtifacts, &e)))?;
    output.plan(&plan);
    Ok(())
}
