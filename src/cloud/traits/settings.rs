// ABOUTME: Application settings operations.
// ABOUTME: Applies application settings with last-write-wins semantics.

use crate::cloud::CloudError;
use crate::types::{FunctionAppName, ResourceGroupName};
use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::BTreeMap;

#[async_trait]
pub trait SettingsOps: Send + Sync {
    /// Set every given key, replacing existing values. Keys not listed are left alone.
    async fn apply_settings(
        &self,
        app: &FunctionAppName,
        resource_group: &ResourceGroupName,
        settings: &BTreeMap<String, SecretString>,
    ) -> Result<(), CloudError>;
}
