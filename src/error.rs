// ABOUTME: Application-wide error type for funcship.
// ABOUTME: Maps every failure category to a distinct process exit code.

use std::path::PathBuf;
use thiserror::Error;

use crate::deploy::DeployFailure;

/// Process exit codes, one per fatal-error category.
pub mod exit_code {
    pub const INTERNAL: i32 = 1;
    pub const AUTHENTICATION: i32 = 10;
    pub const CONFIG: i32 = 11;
    pub const PROVISIONING: i32 = 12;
    pub const UPLOAD: i32 = 13;
    pub const PUBLISH: i32 = 14;
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    #[error("missing required environment variable {var} for setting {setting}")]
    MissingEnvVar { setting: String, var: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("deployment failed: {0}")]
    Deploy(DeployFailure),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Exit code reported to the invoking shell.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::AlreadyExists(_) | Error::Io(_) => exit_code::INTERNAL,
            Error::ConfigNotFound(_)
            | Error::UnknownDestination(_)
            | Error::MissingEnvVar { .. }
            | Error::InvalidConfig(_)
            | Error::Yaml(_) => exit_code::CONFIG,
            Error::Deploy(failure) => failure.exit_code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
