// ABOUTME: The fixed, ordered sequence of deployment steps and their policies.
// ABOUTME: Policies declare idempotency and which steps may retry transient failures.

use serde::Serialize;
use std::fmt;

/// A step of the deployment, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepName {
    Authenticate,
    ResourceGroup,
    StorageAccount,
    StorageCredentials,
    BlobContainer,
    UploadArtifacts,
    FunctionApp,
    AppSettings,
    PublishCode,
}

impl StepName {
    /// Every step, in the order it runs.
    pub const ALL: [StepName; 9] = [
        StepName::Authenticate,
        StepName::ResourceGroup,
        StepName::StorageAccount,
        StepName::StorageCredentials,
        StepName::BlobContainer,
        StepName::UploadArtifacts,
        StepName::FunctionApp,
        StepName::AppSettings,
        StepName::PublishCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepName::Authenticate => "authenticate",
            StepName::ResourceGroup => "resource-group",
            StepName::StorageAccount => "storage-account",
            StepName::StorageCredentials => "storage-credentials",
            StepName::BlobContainer => "blob-container",
            StepName::UploadArtifacts => "upload-artifacts",
            StepName::FunctionApp => "function-app",
            StepName::AppSettings => "app-settings",
            StepName::PublishCode => "publish-code",
        }
    }

    /// One-line description used in plans.
    pub fn describe(&self) -> &'static str {
        match self {
            StepName::Authenticate => "verify the control plane session, logging in if needed",
            StepName::ResourceGroup => "ensure the resource group exists",
            StepName::StorageAccount => "ensure the storage account exists",
            StepName::StorageCredentials => "fetch the storage connection string",
            StepName::BlobContainer => "ensure the artifact container exists",
            StepName::UploadArtifacts => "upload artifacts, overwriting existing blobs",
            StepName::FunctionApp => "ensure the function app exists with the requested runtime",
            StepName::AppSettings => "apply application settings",
            StepName::PublishCode => "publish application code",
        }
    }

    pub fn policy(&self) -> StepPolicy {
        match self {
            StepName::Authenticate => StepPolicy {
                idempotency: Idempotency::ReadOnly,
                retry: RetryScope::Never,
            },
            StepName::ResourceGroup | StepName::StorageAccount | StepName::BlobContainer => {
                StepPolicy {
                    idempotency: Idempotency::CreateOrReuse,
                    retry: RetryScope::Never,
                }
            }
            StepName::StorageCredentials => StepPolicy {
                idempotency: Idempotency::ReadOnly,
                retry: RetryScope::AfterCreation,
            },
            StepName::UploadArtifacts | StepName::AppSettings => StepPolicy {
                idempotency: Idempotency::Overwrite,
                retry: RetryScope::Never,
            },
            StepName::FunctionApp => StepPolicy {
                idempotency: Idempotency::CreateOrReuseIfMatching,
                retry: RetryScope::Never,
            },
            StepName::PublishCode => StepPolicy {
                idempotency: Idempotency::Overwrite,
                retry: RetryScope::Always,
            },
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a step behaves when repeated against an existing environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Idempotency {
    /// Reads remote state only.
    ReadOnly,
    /// Reuses an existing resource, creates it otherwise.
    CreateOrReuse,
    /// Reuses an existing resource only if it matches the request exactly.
    CreateOrReuseIfMatching,
    /// Replaces remote state with the requested state.
    Overwrite,
}

/// When transient failures of a step are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetryScope {
    Never,
    /// Only when a resource the step depends on was created during this run.
    AfterCreation,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepPolicy {
    pub idempotency: Idempotency,
    pub retry: RetryScope,
}

/// Outcome recorded for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
    Succeeded,
    Skipped,
    Failed,
    /// Never started because an earlier step failed.
    NotRun,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Succeeded => "Succeeded",
            StepStatus::Skipped => "Skipped",
            StepStatus::Failed => "Failed",
            StepStatus::NotRun => "NotRun",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_declared_in_execution_order() {
        let mut sorted = StepName::ALL;
        sorted.sort();
        assert_eq!(sorted, StepName::ALL);
    }

    #[test]
    fn only_credentials_and_publish_retry() {
        let retrying: Vec<_> = StepName::ALL
            .iter()
            .filter(|s| s.policy().retry != RetryScope::Never)
            .collect();
        assert_eq!(
            retrying,
            vec![&StepName::StorageCredentials, &StepName::PublishCode]
        );
    }
}
