// ABOUTME: Azure CLI error types with SNAFU context selectors.
// ABOUTME: Classifies tool failures into CloudError variants at the trait boundary.

use snafu::Snafu;

use crate::cloud::CloudError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum AzError {
    #[snafu(display("failed to start `{command}`: {source}"))]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("`{command}` exited with {}: {stderr}", exit_status(code)))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[snafu(display("unexpected output from `{command}`: {source}"))]
    Parse {
        command: String,
        source: serde_json::Error,
    },
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

const AUTH_MARKERS: &[&str] = &[
    "az login",
    "AuthorizationFailed",
    "AuthenticationFailed",
    "InvalidAuthenticationToken",
    "ExpiredAuthenticationToken",
    "AADSTS",
];

const NOT_FOUND_MARKERS: &[&str] = &[
    "ResourceNotFound",
    "ResourceGroupNotFound",
    "ContainerNotFound",
    "could not be found",
    "was not found",
    "(NotFound)",
];

const NAME_TAKEN_MARKERS: &[&str] = &[
    "StorageAccountAlreadyTaken",
    "is already taken",
    "AlreadyTaken",
];

const CONFLICT_MARKERS: &[&str] = &["(Conflict)", "AlreadyExists", "already exists"];

const TRANSIENT_MARKERS: &[&str] = &[
    "timed out",
    "Timeout",
    "Connection aborted",
    "Connection reset",
    "ConnectionError",
    "Max retries exceeded",
    "TooManyRequests",
    "ServiceUnavailable",
    "temporarily unavailable",
    "GatewayTimeout",
    "InternalServerError",
    "Temporary failure in name resolution",
];

/// Map a tool's stderr onto the shared error taxonomy.
pub fn classify_stderr(stderr: &str) -> CloudError {
    let message = first_meaningful_line(stderr);
    let contains_any = |markers: &[&str]| markers.iter().any(|m| stderr.contains(m));

    if contains_any(AUTH_MARKERS) {
        CloudError::Unauthenticated(message)
    } else if contains_any(NAME_TAKEN_MARKERS) {
        CloudError::NameUnavailable {
            name: String::new(),
            reason: message,
        }
    } else if contains_any(NOT_FOUND_MARKERS) {
        CloudError::NotFound(message)
    } else if contains_any(CONFLICT_MARKERS) {
        CloudError::Conflict(message)
    } else if contains_any(TRANSIENT_MARKERS) {
        CloudError::Transient(message)
    } else {
        CloudError::Rejected(message)
    }
}

fn first_meaningful_line(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("WARNING"))
        .unwrap_or("no error output")
        .to_string()
}

impl From<AzError> for CloudError {
    fn from(err: AzError) -> Self {
        match err {
            AzError::Spawn { command, source } => {
                CloudError::Rejected(format!("failed to start `{command}`: {source}"))
            }
            AzError::Failed { stderr, .. } => classify_stderr(&stderr),
            AzError::Parse { command, source } => {
                CloudError::Rejected(format!("unexpected output from `{command}`: {source}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_hint_is_unauthenticated() {
        let err = classify_stderr("ERROR: Please run 'az login' to setup account.");
        assert!(matches!(err, CloudError::Unauthenticated(_)));
    }

    #[test]
    fn taken_storage_name_is_name_unavailable() {
        let err = classify_stderr(
            "ERROR: (StorageAccountAlreadyTaken) The storage account named sttest001 is already taken.",
        );
        assert!(matches!(err, CloudError::NameUnavailable { .. }));
    }

    #[test]
    fn missing_group_is_not_found() {
        let err = classify_stderr(
            "ERROR: (ResourceGroupNotFound) Resource group 'rg-test' could not be found.",
        );
        assert!(matches!(err, CloudError::NotFound(_)));
    }

    #[test]
    fn connection_reset_is_transient() {
        let err = classify_stderr("ERROR: ('Connection aborted.', ConnectionResetError(104))");
        assert!(err.is_transient());
    }

    #[test]
    fn warnings_are_skipped_in_message() {
        let err = classify_stderr("WARNING: preview command\nERROR: something odd happened\n");
        match err {
            CloudError::Rejected(msg) => assert_eq!(msg, "ERROR: something odd happened"),
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
