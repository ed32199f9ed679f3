// ABOUTME: Error type shared by every capability trait.
// ABOUTME: Distinguishes transient failures (safe to retry) from permanent ones.

use std::path::PathBuf;

/// Errors returned by cloud providers.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// No authenticated session, or the session was rejected.
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    /// The requested resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// A globally unique name is already held elsewhere.
    #[error("name {name} is unavailable: {reason}")]
    NameUnavailable { name: String, reason: String },

    /// The resource exists in a state that conflicts with the request.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Network or throttling failure; the same request may succeed later.
    #[error("transient failure: {0}")]
    Transient(String),

    /// A local file the request depends on could not be read.
    #[error("cannot read {}: {source}", path.display())]
    LocalFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The provider refused the request for any other reason.
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl CloudError {
    pub fn is_transient(&self) -> bool {
        matches!(self, CloudError::Transient(_))
    }
}
