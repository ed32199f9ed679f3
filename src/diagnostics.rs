// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but belong in the summary.

/// Collects non-fatal warnings during deployment operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn into_messages(self) -> Vec<String> {
        self.warnings.into_iter().map(|w| w.message).collect()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The upload step had nothing to upload.
    pub fn artifacts_skipped(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ArtifactsSkipped,
            message: message.into(),
        }
    }

    /// An existing resource lives somewhere other than the configured location.
    pub fn location_mismatch(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LocationMismatch,
            message: message.into(),
        }
    }

    /// The provider did not report an existing app's runtime.
    pub fn unknown_runtime(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnknownRuntime,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// No artifacts were uploaded (directory absent, missing or empty).
    ArtifactsSkipped,
    /// Reused resource is in a different location than requested.
    LocationMismatch,
    /// Existing function app runtime could not be verified.
    UnknownRuntime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        assert!(Diagnostics::default().into_messages().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings_in_order() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::artifacts_skipped("artifact directory is empty"));
        diag.warn(Warning::location_mismatch("rg-test is in northeurope"));

        assert_eq!(diag.warnings[0].kind, WarningKind::ArtifactsSkipped);
        assert_eq!(
            diag.into_messages(),
            vec![
                "artifact directory is empty".to_string(),
                "rg-test is in northeurope".to_string()
            ]
        );
    }
}
