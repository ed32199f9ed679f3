// ABOUTME: Resource group operations: look up and create.
// ABOUTME: Looks up and creates resource groups.

use super::shared_types::ResourceGroupInfo;
use crate::cloud::CloudError;
use crate::types::{Location, ResourceGroupName};
use async_trait::async_trait;

#[async_trait]
pub trait ResourceGroupOps: Send + Sync {
    async fn resource_group(
        &self,
        name: &ResourceGroupName,
    ) -> Result<Option<ResourceGroupInfo>, CloudError>;

    async fn create_resource_group(
        &self,
        name: &ResourceGroupName,
        location: &Location,
    ) -> Result<ResourceGroupInfo, CloudError>;
}
