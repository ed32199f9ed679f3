// ABOUTME: Blob store operations: ensure a container and upload objects.
// ABOUTME: Ensures blob containers exist and uploads local files as blobs.

use crate::cloud::CloudError;
use crate::types::ContainerName;
use async_trait::async_trait;
use secrecy::SecretString;
use std::path::Path;

#[async_trait]
pub trait ObjectStoreOps: Send + Sync {
    /// Create the container if missing. Returns `true` when it was created.
    async fn ensure_container(
        &self,
        connection: &SecretString,
        container: &ContainerName,
    ) -> Result<bool, CloudError>;

    /// Upload a local file as `blob_name`.
    async fn upload_blob(
        &self,
        connection: &SecretString,
        container: &ContainerName,
        blob_name: &str,
        source: &Path,
        overwrite: bool,
    ) -> Result<(), CloudError>;
}
