// ABOUTME: Validate command implementation.
// ABOUTME: Reports the resolved configuration without touching the provider.

use funcship::config::DeploymentConfig;
use funcship::error::Result;
use funcship::output::Output;

pub fn validate(config: DeploymentConfig, output: Output) -> Result<()> {
    output.progress(&format!("Resource group:  {}", config.resource_group));
    output.progress(&format!("Location:        {}", config.location));
    output.progress(&format!(
        "Storage account: {} ({})",
        config.storage_account, config.storage_sku
    ));
    output.progress(&format!("Container:       {}", config.container));
    output.progress(&format!(
        "Function app:    {} ({} {}, functions v{})",
        config.function_app, config.runtime, config.runtime_version, config.functions_version
    ));
    match &config.artifact_directory {
        Some(dir) => output.progress(&format!("Artifacts:       {}", dir.display())),
        None => output.progress("Artifacts:       none"),
    }
    output.success("Configuration is valid");
    Ok(())
}
