// ABOUTME: Dry-run plan: the step sequence a deployment would execute.
// ABOUTME: Built from local state only; never calls the provider.

use serde::Serialize;

use super::artifacts::{Artifact, ArtifactPlan, resolve_artifacts};
use super::error::DeployError;
use super::orchestrator::{CONNECTION_SETTING, CONTAINER_SETTING};
use super::step::{StepName, StepPolicy};
use crate::cloud::{ProvisionedResource, ResourceKind};
use crate::config::DeploymentConfig;

/// Host suffix the provider assigns to function apps.
pub const DEFAULT_HOST_SUFFIX: &str = "azurewebsites.net";

#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep {
    pub step: StepName,
    pub description: &'static str,
    pub policy: StepPolicy,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub steps: Vec<PlannedStep>,
    pub resources: Vec<ProvisionedResource>,
    pub uploads: Vec<Artifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploads_skipped: Option<String>,
    /// Setting names only; values may be secret.
    pub settings: Vec<String>,
    pub endpoints: Vec<String>,
}

impl DeploymentPlan {
    pub fn build(config: &DeploymentConfig) -> Result<Self, DeployError> {
        let (uploads, uploads_skipped) = match resolve_artifacts(config)? {
            ArtifactPlan::Upload(artifacts) => (artifacts, None),
            ArtifactPlan::Skip(reason) => (Vec::new(), Some(reason)),
        };

        let rg = config.resource_group.to_string();
        let resource = |kind, name: String| ProvisionedResource {
            kind,
            name,
            resource_group: rg.clone(),
        };
        let resources = vec![
            resource(ResourceKind::ResourceGroup, rg.clone()),
            resource(ResourceKind::StorageAccount, config.storage_account.to_string()),
            resource(ResourceKind::BlobContainer, config.container.to_string()),
            resource(ResourceKind::FunctionApp, config.function_app.to_string()),
        ];

        let mut settings: Vec<String> = vec![
            CONNECTION_SETTING.to_string(),
            CONTAINER_SETTING.to_string(),
        ];
        for key in config.settings.keys() {
            if !settings.contains(key) {
                settings.push(key.clone());
            }
        }

        let host = format!("{}.{}", config.function_app, DEFAULT_HOST_SUFFIX);
        let endpoints = super::endpoints(&host, &config.routes);

        Ok(Self {
            destination: config.destination.clone(),
            steps: StepName::ALL
                .iter()
                .map(|step| PlannedStep {
                    step: *step,
                    description: step.describe(),
                    policy: step.policy(),
                })
                .collect(),
            resources,
            uploads,
            uploads_skipped,
            settings,
            endpoints,
        })
    }
}
