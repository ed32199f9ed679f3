// ABOUTME: Authentication capability for the control plane client.
// ABOUTME: Checks for an active control plane session and starts interactive login.

use super::shared_types::Account;
use crate::cloud::CloudError;
use async_trait::async_trait;

#[async_trait]
pub trait AuthOps: Send + Sync {
    /// The signed-in account, or `None` when no session exists.
    async fn current_account(&self) -> Result<Option<Account>, CloudError>;

    /// Run the interactive sign-in flow.
    async fn login(&self) -> Result<(), CloudError>;
}
