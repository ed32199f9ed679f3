// ABOUTME: Composable capability traits for cloud providers.
// ABOUTME: Defines AuthOps, ResourceGroupOps, StorageOps, ObjectStoreOps, FunctionAppOps, SettingsOps, PublishOps.

mod auth;
mod function_app;
mod object_store;
mod publish;
mod resource_group;
mod settings;
mod shared_types;
mod storage;

pub use auth::AuthOps;
pub use function_app::FunctionAppOps;
pub use object_store::ObjectStoreOps;
pub use publish::PublishOps;
pub use resource_group::ResourceGroupOps;
pub use settings::SettingsOps;
pub use shared_types::*;
pub use storage::StorageOps;

/// Every capability a full deployment needs.
pub trait CloudProvider:
    AuthOps
    + ResourceGroupOps
    + StorageOps
    + ObjectStoreOps
    + FunctionAppOps
    + SettingsOps
    + PublishOps
{
}

impl<T> CloudProvider for T where
    T: AuthOps
        + ResourceGroupOps
        + StorageOps
        + ObjectStoreOps
        + FunctionAppOps
        + SettingsOps
        + PublishOps
{
}
