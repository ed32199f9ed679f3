// ABOUTME: Storage account operations: look up, create, fetch credentials.
// ABOUTME: Looks up and creates storage accounts and fetches their connection strings.

use super::shared_types::{StorageAccountInfo, StorageAccountSpec};
use crate::cloud::CloudError;
use crate::types::{ResourceGroupName, StorageAccountName};
use async_trait::async_trait;
use secrecy::SecretString;

#[async_trait]
pub trait StorageOps: Send + Sync {
    /// Look up an account inside the given resource group.
    async fn storage_account(
        &self,
        name: &StorageAccountName,
        resource_group: &ResourceGroupName,
    ) -> Result<Option<StorageAccountInfo>, CloudError>;

    /// Create an account.
    ///
    /// Returns [`CloudError::NameUnavailable`] when the globally unique name
    /// is already taken by someone else.
    async fn create_storage_account(
        &self,
        spec: &StorageAccountSpec,
    ) -> Result<StorageAccountInfo, CloudError>;

    /// Connection string granting access to the account's blob service.
    async fn connection_string(
        &self,
        name: &StorageAccountName,
        resource_group: &ResourceGroupName,
    ) -> Result<SecretString, CloudError>;
}
