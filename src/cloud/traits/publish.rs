// ABOUTME: Code publishing operation.
// ABOUTME: Pushes application code from a local directory to a function app.

use super::shared_types::PublishRequest;
use crate::cloud::CloudError;
use async_trait::async_trait;

#[async_trait]
pub trait PublishOps: Send + Sync {
    /// Package `request.source_dir` and push it to the function app, replacing
    /// the currently deployed code.
    async fn publish(&self, request: &PublishRequest) -> Result<(), CloudError>;
}
