// ABOUTME: Function app language runtime and its supported versions.
// ABOUTME: Maps runtimes to provider identifiers used on create, inspect and publish.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime version cannot be empty")]
    EmptyVersion,

    #[error("unsupported {runtime} version {version} (supported: {supported})")]
    UnsupportedVersion {
        runtime: Runtime,
        version: String,
        supported: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Runtime {
    #[default]
    Python,
    Node,
    DotnetIsolated,
    Java,
    Powershell,
}

impl Runtime {
    /// Identifier passed to the control plane on creation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Python => "python",
            Runtime::Node => "node",
            Runtime::DotnetIsolated => "dotnet-isolated",
            Runtime::Java => "java",
            Runtime::Powershell => "powershell",
        }
    }

    pub fn supported_versions(&self) -> &'static [&'static str] {
        match self {
            Runtime::Python => &["3.9", "3.10", "3.11", "3.12"],
            Runtime::Node => &["18", "20", "22"],
            Runtime::DotnetIsolated => &["8.0", "9.0"],
            Runtime::Java => &["11", "17", "21"],
            Runtime::Powershell => &["7.4"],
        }
    }

    /// Prefix of the Linux stack descriptor (e.g. `Python|3.11`).
    pub fn stack_prefix(&self) -> &'static str {
        match self {
            Runtime::Python => "PYTHON",
            Runtime::Node => "NODE",
            Runtime::DotnetIsolated => "DOTNET-ISOLATED",
            Runtime::Java => "JAVA",
            Runtime::Powershell => "POWERSHELL",
        }
    }

    /// Parse a Linux stack descriptor such as `Python|3.11` into runtime and version.
    pub fn parse_stack(descriptor: &str) -> Option<(Runtime, String)> {
        let (prefix, version) = descriptor.split_once('|')?;
        let prefix = prefix.trim().to_ascii_uppercase();
        let runtime = [
            Runtime::Python,
            Runtime::Node,
            Runtime::DotnetIsolated,
            Runtime::Java,
            Runtime::Powershell,
        ]
        .into_iter()
        .find(|r| r.stack_prefix() == prefix)?;
        Some((runtime, version.trim().to_string()))
    }

    /// Language flag for the code publishing tool, if it needs one.
    pub fn publish_flag(&self) -> Option<&'static str> {
        match self {
            Runtime::Python => Some("--python"),
            Runtime::Node => Some("--javascript"),
            Runtime::DotnetIsolated => Some("--dotnet-isolated"),
            Runtime::Java => Some("--java"),
            Runtime::Powershell => Some("--powershell"),
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A runtime version checked against the runtime it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RuntimeVersion(String);

impl RuntimeVersion {
    pub fn new(runtime: Runtime, value: &str) -> Result<Self, RuntimeError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RuntimeError::EmptyVersion);
        }

        let supported = runtime.supported_versions();
        if !supported.contains(&value) {
            return Err(RuntimeError::UnsupportedVersion {
                runtime,
                version: value.to_string(),
                supported: supported.join(", "),
            });
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
