// ABOUTME: Function app operations: look up and create.
// ABOUTME: Looks up and creates function apps with a given runtime.

use super::shared_types::{FunctionAppInfo, FunctionAppSpec};
use crate::cloud::CloudError;
use crate::types::{FunctionAppName, ResourceGroupName};
use async_trait::async_trait;

#[async_trait]
pub trait FunctionAppOps: Send + Sync {
    async fn function_app(
        &self,
        name: &FunctionAppName,
        resource_group: &ResourceGroupName,
    ) -> Result<Option<FunctionAppInfo>, CloudError>;

    async fn create_function_app(
        &self,
        spec: &FunctionAppSpec,
    ) -> Result<FunctionAppInfo, CloudError>;
}
