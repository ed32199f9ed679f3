// ABOUTME: Error taxonomy for deployment steps.
// ABOUTME: Each error has a kind; only TransientNetwork is retried, everything else is fatal.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::step::StepName;
use crate::cloud::CloudError;
use crate::error::exit_code;

/// Category of a deployment error, used for retry decisions and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeployErrorKind {
    Authentication,
    ConfigValidation,
    ResourceConflict,
    TransientNetwork,
    MissingArtifact,
    RuntimeMismatch,
    Publish,
    /// Any other refusal from the provider.
    Provider,
    Cancelled,
}

impl fmt::Display for DeployErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeployErrorKind::Authentication => "AuthenticationError",
            DeployErrorKind::ConfigValidation => "ConfigValidationError",
            DeployErrorKind::ResourceConflict => "ResourceConflictError",
            DeployErrorKind::TransientNetwork => "TransientNetworkError",
            DeployErrorKind::MissingArtifact => "MissingArtifactError",
            DeployErrorKind::RuntimeMismatch => "RuntimeMismatchError",
            DeployErrorKind::Publish => "PublishError",
            DeployErrorKind::Provider => "ProviderError",
            DeployErrorKind::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

/// Errors that can occur while executing a deployment step.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("invalid configuration: {0}")]
    ConfigValidation(String),

    #[error("resource conflict: {0}")]
    ResourceConflict(String),

    #[error("transient network failure: {0}")]
    TransientNetwork(String),

    #[error("step exceeded its time budget of {0:?}")]
    Timeout(Duration),

    #[error("artifact not found: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error(
        "function app {app} runs {actual}, but {expected} was requested; refusing to modify it"
    )]
    RuntimeMismatch {
        app: String,
        expected: String,
        actual: String,
    },

    #[error("publish failed after {attempts} attempt(s): {message}")]
    Publish { attempts: u32, message: String },

    #[error("provider error: {0}")]
    Provider(String),

    #[error("deployment cancelled before this step started")]
    Cancelled,
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Authentication(_) => DeployErrorKind::Authentication,
            DeployError::ConfigValidation(_) => DeployErrorKind::ConfigValidation,
            DeployError::ResourceConflict(_) => DeployErrorKind::ResourceConflict,
            DeployError::TransientNetwork(_) | DeployError::Timeout(_) => {
                DeployErrorKind::TransientNetwork
            }
            DeployError::MissingArtifact(_) => DeployErrorKind::MissingArtifact,
            DeployError::RuntimeMismatch { .. } => DeployErrorKind::RuntimeMismatch,
            DeployError::Publish { .. } => DeployErrorKind::Publish,
            DeployError::Provider(_) => DeployErrorKind::Provider,
            DeployError::Cancelled => DeployErrorKind::Cancelled,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == DeployErrorKind::TransientNetwork
    }
}

impl From<CloudError> for DeployError {
    fn from(err: CloudError) -> Self {
        match err {
            CloudError::Unauthenticated(msg) => DeployError::Authentication(msg),
            CloudError::NameUnavailable { name, reason } => {
                DeployError::ResourceConflict(format!("name {name} is unavailable: {reason}"))
            }
            CloudError::Conflict(msg) => DeployError::ResourceConflict(msg),
            CloudError::Transient(msg) => DeployError::TransientNetwork(msg),
            CloudError::LocalFile { path, source }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                DeployError::MissingArtifact(path)
            }
            other @ (CloudError::LocalFile { .. }
            | CloudError::NotFound(_)
            | CloudError::Rejected(_)) => DeployError::Provider(other.to_string()),
        }
    }
}

/// The fatal error that ended a run, as reported to the invoker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployFailure {
    pub step: StepName,
    pub kind: DeployErrorKind,
    pub message: String,
}

impl DeployFailure {
    pub fn new(step: StepName, error: &DeployError) -> Self {
        Self {
            step,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// Exit code for this failure's category.
    pub fn exit_code(&self) -> i32 {
        match self.kind {
            DeployErrorKind::Authentication => exit_code::AUTHENTICATION,
            DeployErrorKind::ConfigValidation => exit_code::CONFIG,
            DeployErrorKind::MissingArtifact => exit_code::UPLOAD,
            DeployErrorKind::Publish => exit_code::PUBLISH,
            DeployErrorKind::Cancelled => exit_code::CANCELLED,
            DeployErrorKind::ResourceConflict
            | DeployErrorKind::TransientNetwork
            | DeployErrorKind::RuntimeMismatch
            | DeployErrorKind::Provider => match self.step {
                StepName::Authenticate => exit_code::AUTHENTICATION,
                StepName::UploadArtifacts => exit_code::UPLOAD,
                StepName::PublishCode => exit_code::PUBLISH,
                _ => exit_code::PROVISIONING,
            },
        }
    }
}

impl fmt::Display for DeployFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} failed with {}: {}", self.step, self.kind, self.message)
    }
}
