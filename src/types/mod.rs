// ABOUTME: Validated names and enumerations for provisioned cloud resources.
// ABOUTME: Each type enforces the provider's naming rules at construction time.

mod container_name;
mod function_app_name;
mod location;
mod resource_group;
mod runtime;
mod storage_account_name;
mod storage_sku;

pub use container_name::{ContainerName, ContainerNameError};
pub use function_app_name::{FunctionAppName, FunctionAppNameError};
pub use location::{Location, LocationError};
pub use resource_group::{ResourceGroupName, ResourceGroupNameError};
pub use runtime::{Runtime, RuntimeError, RuntimeVersion};
pub use storage_account_name::{StorageAccountName, StorageAccountNameError};
pub use storage_sku::StorageSku;
