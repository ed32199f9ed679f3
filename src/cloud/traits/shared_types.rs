// ABOUTME: Request and response types shared across capability traits.
// ABOUTME: Specs passed to create calls and info returned by lookups.

use serde::Serialize;
use std::path::PathBuf;

use crate::types::{
    FunctionAppName, Location, ResourceGroupName, Runtime, RuntimeVersion, StorageAccountName,
    StorageSku,
};

/// The signed-in control plane account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub subscription_id: String,
    pub subscription_name: String,
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroupInfo {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct StorageAccountSpec {
    pub name: StorageAccountName,
    pub resource_group: ResourceGroupName,
    pub location: Location,
    pub sku: StorageSku,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAccountInfo {
    pub name: String,
    pub resource_group: String,
    pub location: String,
}

#[derive(Debug, Clone)]
pub struct FunctionAppSpec {
    pub name: FunctionAppName,
    pub resource_group: ResourceGroupName,
    pub location: Location,
    pub storage_account: StorageAccountName,
    pub runtime: Runtime,
    pub runtime_version: RuntimeVersion,
    pub functions_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionAppInfo {
    pub name: String,
    pub default_host_name: String,
    /// Runtime and version reported by the provider, if it reports one.
    pub runtime: Option<(Runtime, String)>,
}

#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub app: FunctionAppName,
    pub resource_group: ResourceGroupName,
    pub runtime: Runtime,
    pub source_dir: PathBuf,
}

/// Kind of a remote object managed by a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    ResourceGroup,
    StorageAccount,
    BlobContainer,
    FunctionApp,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResourceKind::ResourceGroup => "resource group",
            ResourceKind::StorageAccount => "storage account",
            ResourceKind::BlobContainer => "blob container",
            ResourceKind::FunctionApp => "function app",
        };
        f.write_str(s)
    }
}

/// Handle to a remote object the deployment ensured exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedResource {
    pub kind: ResourceKind,
    pub name: String,
    pub resource_group: String,
}
