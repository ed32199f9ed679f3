// ABOUTME: Runs the deployment steps in order against a cloud provider.
// ABOUTME: Stops at the first fatal error, never rolls back, and always returns a result.

use secrecy::SecretString;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use super::artifacts::{ArtifactPlan, resolve_artifacts};
use super::cancel::CancelFlag;
use super::error::{DeployError, DeployFailure};
use super::result::{DeploymentResult, StepReport, UploadReport};
use super::retry::{Exhausted, RetryPolicy, retry};
use super::step::{RetryScope, StepName, StepStatus};
use crate::cloud::{
    CloudError, CloudProvider, FunctionAppInfo, FunctionAppSpec, ProvisionedResource,
    PublishRequest, ResourceKind, StorageAccountSpec,
};
use crate::config::DeploymentConfig;
use crate::diagnostics::{Diagnostics, Warning};

/// Setting the function host reads its storage connection from.
pub const CONNECTION_SETTING: &str = "AzureWebJobsStorage";

/// Setting telling the app which container holds its artifacts.
pub const CONTAINER_SETTING: &str = "STORAGE_CONTAINER";

/// Values produced by earlier steps and consumed by later ones.
#[derive(Default)]
struct RunState {
    storage_created: bool,
    connection: Option<SecretString>,
    function_app: Option<FunctionAppInfo>,
    uploads: Vec<UploadReport>,
    resources: Vec<ProvisionedResource>,
    diagnostics: Diagnostics,
}

/// How a step finished when it did not fail.
struct StepOutcome {
    status: StepStatus,
    attempts: u32,
    detail: Option<String>,
}

impl StepOutcome {
    fn succeeded() -> Self {
        Self {
            status: StepStatus::Succeeded,
            attempts: 1,
            detail: None,
        }
    }

    fn after(attempts: u32) -> Self {
        Self {
            attempts,
            ..Self::succeeded()
        }
    }

    fn skipped(reason: String) -> Self {
        Self {
            status: StepStatus::Skipped,
            attempts: 0,
            detail: Some(reason),
        }
    }
}

/// Executes a deployment against any [`CloudProvider`].
pub struct Orchestrator<'a, P> {
    provider: &'a P,
    cancel: CancelFlag,
}

impl<'a, P: CloudProvider> Orchestrator<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            cancel: CancelFlag::default(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run every step in order and report what happened.
    pub async fn run(&self, config: &DeploymentConfig) -> DeploymentResult {
        let mut result = DeploymentResult::new(config.destination.clone());
        let mut state = RunState::default();

        for step in StepName::ALL {
            if self.cancel.is_cancelled() {
                let error = DeployError::Cancelled;
                tracing::warn!(step = %step, "cancelled before step started");
                result.failure = Some(DeployFailure::new(step, &error));
                result.steps.push(StepReport {
                    step,
                    status: StepStatus::Failed,
                    attempts: 0,
                    detail: Some(error.to_string()),
                });
                break;
            }

            tracing::info!(step = %step, "starting step");
            match self.execute(step, config, &mut state).await {
                Ok(outcome) => {
                    tracing::info!(
                        step = %step,
                        status = %outcome.status,
                        attempts = outcome.attempts,
                        "finished step"
                    );
                    result.steps.push(StepReport {
                        step,
                        status: outcome.status,
                        attempts: outcome.attempts,
                        detail: outcome.detail,
                    });
                }
                Err(Exhausted { error, attempts }) => {
                    tracing::error!(
                        step = %step,
                        kind = %error.kind(),
                        attempts,
                        error = %error,
                        "step failed"
                    );
                    result.failure = Some(DeployFailure::new(step, &error));
                    result.steps.push(StepReport {
                        step,
                        status: StepStatus::Failed,
                        attempts,
                        detail: Some(error.to_string()),
                    });
                    break;
                }
            }
        }

        result.mark_remaining_not_run();
        result.uploads = state.uploads;
        result.resources = state.resources;
        result.warnings = state.diagnostics.into_messages();
        if result.succeeded()
            && let Some(app) = state.function_app
        {
            result.endpoints = super::endpoints(&app.default_host_name, &config.routes);
        }
        result
    }

    async fn execute(
        &self,
        step: StepName,
        config: &DeploymentConfig,
        state: &mut RunState,
    ) -> Result<StepOutcome, Exhausted> {
        let budget = config.step_timeout;
        match step {
            StepName::Authenticate => once(within(budget, self.authenticate())).await,
            StepName::ResourceGroup => {
                once(within(budget, self.resource_group(config, state))).await
            }
            StepName::StorageAccount => {
                once(within(budget, self.storage_account(config, state))).await
            }
            StepName::StorageCredentials => self.storage_credentials(config, state).await,
            StepName::BlobContainer => {
                once(within(budget, self.blob_container(config, state))).await
            }
            StepName::UploadArtifacts => once(self.upload_artifacts(config, state)).await,
            StepName::FunctionApp => once(within(budget, self.function_app(config, state))).await,
            StepName::AppSettings => once(within(budget, self.app_settings(config, state))).await,
            StepName::PublishCode => self.publish_code(config).await,
        }
    }

    async fn authenticate(&self) -> Result<StepOutcome, DeployError> {
        let auth_error = |e: CloudError| DeployError::Authentication(e.to_string());

        if let Some(account) = self.provider.current_account().await.map_err(auth_error)? {
            tracing::info!(
                subscription = %account.subscription_name,
                user = account.user.as_deref().unwrap_or("unknown"),
                "using existing session"
            );
            return Ok(StepOutcome::succeeded());
        }

        tracing::info!("no active session, starting interactive login");
        self.provider.login().await.map_err(auth_error)?;

        match self.provider.current_account().await.map_err(auth_error)? {
            Some(account) => {
                tracing::info!(subscription = %account.subscription_name, "logged in");
                Ok(StepOutcome::succeeded())
            }
            None => Err(DeployError::Authentication(
                "no authenticated session after login".to_string(),
            )),
        }
    }

    async fn resource_group(
        &self,
        config: &DeploymentConfig,
        state: &mut RunState,
    ) -> Result<StepOutcome, DeployError> {
        let name = &config.resource_group;
        match self.provider.resource_group(name).await? {
            Some(existing) => {
                tracing::info!(resource_group = %name, "resource group exists, reusing");
                if !same_location(&existing.location, config.location.as_str()) {
                    state.diagnostics.warn(Warning::location_mismatch(format!(
                        "resource group {name} is in {}, not {}",
                        existing.location, config.location
                    )));
                }
            }
            None => {
                self.provider
                    .create_resource_group(name, &config.location)
                    .await?;
                tracing::info!(resource_group = %name, location = %config.location, "created resource group");
            }
        }

        state.resources.push(ProvisionedResource {
            kind: ResourceKind::ResourceGroup,
            name: name.to_string(),
            resource_group: name.to_string(),
        });
        Ok(StepOutcome::succeeded())
    }

    async fn storage_account(
        &self,
        config: &DeploymentConfig,
        state: &mut RunState,
    ) -> Result<StepOutcome, DeployError> {
        let name = &config.storage_account;
        let rg = &config.resource_group;

        if self.provider.storage_account(name, rg).await?.is_some() {
            tracing::info!(storage_account = %name, "storage account exists, reusing");
        } else {
            let spec = StorageAccountSpec {
                name: name.clone(),
                resource_group: rg.clone(),
                location: config.location.clone(),
                sku: config.storage_sku,
            };
            self.provider
                .create_storage_account(&spec)
                .await
                .map_err(|e| match e {
                    CloudError::NameUnavailable { reason, .. } => {
                        DeployError::ResourceConflict(format!(
                            "storage account name {name} is taken outside resource group {rg}: {reason}"
                        ))
                    }
                    other => other.into(),
                })?;
            state.storage_created = true;
            tracing::info!(storage_account = %name, sku = %config.storage_sku, "created storage account");
        }

        state.resources.push(ProvisionedResource {
            kind: ResourceKind::StorageAccount,
            name: name.to_string(),
            resource_group: rg.to_string(),
        });
        Ok(StepOutcome::succeeded())
    }

    async fn storage_credentials(
        &self,
        config: &DeploymentConfig,
        state: &mut RunState,
    ) -> Result<StepOutcome, Exhausted> {
        let policy = retry_policy(StepName::StorageCredentials, config, state.storage_created);

        let (connection, attempts) = retry(policy, "fetch storage credentials", |_| {
            within(config.step_timeout, async move {
                self.provider
                    .connection_string(&config.storage_account, &config.resource_group)
                    .await
                    .map_err(DeployError::from)
            })
        })
        .await?;

        state.connection = Some(connection);
        Ok(StepOutcome::after(attempts))
    }

    async fn blob_container(
        &self,
        config: &DeploymentConfig,
        state: &mut RunState,
    ) -> Result<StepOutcome, DeployError> {
        let connection = require(&state.connection, "storage credentials")?;
        let created = self
            .provider
            .ensure_container(connection, &config.container)
            .await?;
        tracing::info!(container = %config.container, created, "container ready");

        state.resources.push(ProvisionedResource {
            kind: ResourceKind::BlobContainer,
            name: config.container.to_string(),
            resource_group: config.resource_group.to_string(),
        });
        Ok(StepOutcome::succeeded())
    }

    async fn upload_artifacts(
        &self,
        config: &DeploymentConfig,
        state: &mut RunState,
    ) -> Result<StepOutcome, DeployError> {
        let artifacts = match resolve_artifacts(config)? {
            ArtifactPlan::Skip(reason) => {
                state
                    .diagnostics
                    .warn(Warning::artifacts_skipped(format!("upload skipped: {reason}")));
                return Ok(StepOutcome::skipped(reason));
            }
            ArtifactPlan::Upload(artifacts) => artifacts,
        };

        let connection = require(&state.connection, "storage credentials")?.clone();
        state.uploads = artifacts
            .iter()
            .map(|a| UploadReport {
                remote_name: a.remote_name.clone(),
                local_path: a.local_path.clone(),
                overwrite: true,
                status: StepStatus::NotRun,
            })
            .collect();

        for (index, artifact) in artifacts.iter().enumerate() {
            tracing::info!(
                blob = %artifact.remote_name,
                file = %artifact.local_path.display(),
                "uploading artifact"
            );
            let upload = async {
                self.provider
                    .upload_blob(
                        &connection,
                        &config.container,
                        &artifact.remote_name,
                        &artifact.local_path,
                        true,
                    )
                    .await
                    .map_err(DeployError::from)
            };

            match within(config.step_timeout, upload).await {
                Ok(()) => {
                    state.uploads[index].status = StepStatus::Succeeded;
                    tracing::info!(blob = %artifact.remote_name, "uploaded artifact");
                }
                Err(e) => {
                    state.uploads[index].status = StepStatus::Failed;
                    return Err(e);
                }
            }
        }

        Ok(StepOutcome::succeeded())
    }

    async fn function_app(
        &self,
        config: &DeploymentConfig,
        state: &mut RunState,
    ) -> Result<StepOutcome, DeployError> {
        let name = &config.function_app;
        let rg = &config.resource_group;

        let app = match self.provider.function_app(name, rg).await? {
            Some(existing) => {
                match &existing.runtime {
                    Some((runtime, version))
                        if *runtime != config.runtime
                            || !version.eq_ignore_ascii_case(config.runtime_version.as_str()) =>
                    {
                        return Err(DeployError::RuntimeMismatch {
                            app: name.to_string(),
                            expected: format!("{} {}", config.runtime, config.runtime_version),
                            actual: format!("{runtime} {version}"),
                        });
                    }
                    Some(_) => {}
                    None => state.diagnostics.warn(Warning::unknown_runtime(format!(
                        "could not determine the runtime of existing function app {name}; reusing it"
                    ))),
                }
                tracing::info!(function_app = %name, "function app exists, reusing");
                existing
            }
            None => {
                let spec = FunctionAppSpec {
                    name: name.clone(),
                    resource_group: rg.clone(),
                    location: config.location.clone(),
                    storage_account: config.storage_account.clone(),
                    runtime: config.runtime,
                    runtime_version: config.runtime_version.clone(),
                    functions_version: config.functions_version.clone(),
                };
                let created = self.provider.create_function_app(&spec).await?;
                tracing::info!(
                    function_app = %name,
                    runtime = %config.runtime,
                    version = %config.runtime_version,
                    "created function app"
                );
                created
            }
        };

        state.resources.push(ProvisionedResource {
            kind: ResourceKind::FunctionApp,
            name: name.to_string(),
            resource_group: rg.to_string(),
        });
        state.function_app = Some(app);
        Ok(StepOutcome::succeeded())
    }

    async fn app_settings(
        &self,
        config: &DeploymentConfig,
        state: &mut RunState,
    ) -> Result<StepOutcome, DeployError> {
        let connection = require(&state.connection, "storage credentials")?;
        let settings = build_settings(config, connection);
        tracing::info!(
            count = settings.len(),
            keys = ?settings.keys().collect::<Vec<_>>(),
            "applying settings"
        );

        self.provider
            .apply_settings(&config.function_app, &config.resource_group, &settings)
            .await?;
        Ok(StepOutcome::succeeded())
    }

    async fn publish_code(&self, config: &DeploymentConfig) -> Result<StepOutcome, Exhausted> {
        if !config.app_directory.is_dir() {
            return Err(Exhausted {
                error: DeployError::ConfigValidation(format!(
                    "app directory {} does not exist",
                    config.app_directory.display()
                )),
                attempts: 0,
            });
        }

        let request = PublishRequest {
            app: config.function_app.clone(),
            resource_group: config.resource_group.clone(),
            runtime: config.runtime,
            source_dir: config.app_directory.clone(),
        };
        let request = &request;
        let policy = retry_policy(StepName::PublishCode, config, false);

        let published = retry(policy, "publish code", |attempt| {
            tracing::info!(attempt, source = %request.source_dir.display(), "publishing code");
            within(config.step_timeout, async move {
                self.provider
                    .publish(request)
                    .await
                    .map_err(DeployError::from)
            })
        })
        .await;

        match published {
            Ok(((), attempts)) => Ok(StepOutcome::after(attempts)),
            Err(Exhausted { error, attempts }) => {
                let error = match error {
                    DeployError::Authentication(_) | DeployError::Cancelled => error,
                    other => DeployError::Publish {
                        attempts,
                        message: other.to_string(),
                    },
                };
                Err(Exhausted { error, attempts })
            }
        }
    }
}

/// Settings applied to the app: storage wiring first, then user settings, which win.
/// Retry policy for `step`, from its declared scope and the configured attempts.
fn retry_policy(step: StepName, config: &DeploymentConfig, created: bool) -> RetryPolicy {
    let attempts = match step {
        StepName::StorageCredentials => config.retry.credential_attempts,
        StepName::PublishCode => config.retry.publish_retries.saturating_add(1),
        _ => 1,
    };
    match step.policy().retry {
        RetryScope::Always => RetryPolicy::with_attempts(&config.retry, attempts),
        RetryScope::AfterCreation if created => RetryPolicy::with_attempts(&config.retry, attempts),
        RetryScope::AfterCreation | RetryScope::Never => RetryPolicy::once(),
    }
}

fn build_settings(
    config: &DeploymentConfig,
    connection: &SecretString,
) -> BTreeMap<String, SecretString> {
    let mut settings = BTreeMap::new();
    settings.insert(CONNECTION_SETTING.to_string(), connection.clone());
    settings.insert(
        CONTAINER_SETTING.to_string(),
        SecretString::from(config.container.to_string()),
    );
    for (key, value) in &config.settings {
        settings.insert(key.clone(), SecretString::from(value.clone()));
    }
    settings
}

/// Enforce the per-step wall-clock budget.
async fn within<T>(
    budget: Duration,
    fut: impl Future<Output = Result<T, DeployError>>,
) -> Result<T, DeployError> {
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(DeployError::Timeout(budget)),
    }
}

/// Adapt a single-attempt step to the retrying signature.
async fn once(
    fut: impl Future<Output = Result<StepOutcome, DeployError>>,
) -> Result<StepOutcome, Exhausted> {
    fut.await.map_err(|error| Exhausted { error, attempts: 1 })
}

fn require<'s, T>(value: &'s Option<T>, what: &str) -> Result<&'s T, DeployError> {
    value
        .as_ref()
        .ok_or_else(|| DeployError::Provider(format!("{what} not available from earlier step")))
}

fn same_location(reported: &str, requested: &str) -> bool {
    let normalize = |s: &str| {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase()
    };
    normalize(reported) == normalize(requested)
}
