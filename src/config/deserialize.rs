// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Routes raw strings through the validated name constructors.

use serde::Deserialize;
use std::fmt::Display;

use crate::types::{
    ContainerName, FunctionAppName, Location, ResourceGroupName, StorageAccountName,
};

fn validated<'de, D, T, E>(
    deserializer: D,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    E: Display,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(serde::de::Error::custom)
}

fn validated_option<'de, D, T, E>(
    deserializer: D,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    E: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) => parse(&s).map(Some).map_err(serde::de::Error::custom),
    }
}

pub fn resource_group<'de, D>(deserializer: D) -> Result<ResourceGroupName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    validated(deserializer, ResourceGroupName::new)
}

pub fn location<'de, D>(deserializer: D) -> Result<Location, D::Error>
where
    D: serde::Deserializer<'de>,
{
    validated(deserializer, Location::new)
}

pub fn storage_account<'de, D>(deserializer: D) -> Result<StorageAccountName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    validated(deserializer, StorageAccountName::new)
}

pub fn function_app<'de, D>(deserializer: D) -> Result<FunctionAppName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    validated(deserializer, FunctionAppName::new)
}

pub fn container<'de, D>(deserializer: D) -> Result<ContainerName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    validated(deserializer, ContainerName::new)
}

pub fn resource_group_option<'de, D>(
    deserializer: D,
) -> Result<Option<ResourceGroupName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    validated_option(deserializer, ResourceGroupName::new)
}

pub fn location_option<'de, D>(deserializer: D) -> Result<Option<Location>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    validated_option(deserializer, Location::new)
}

pub fn storage_account_option<'de, D>(
    deserializer: D,
) -> Result<Option<StorageAccountName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    validated_option(deserializer, StorageAccountName::new)
}

pub fn function_app_option<'de, D>(deserializer: D) -> Result<Option<FunctionAppName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    validated_option(deserializer, FunctionAppName::new)
}

pub fn container_option<'de, D>(deserializer: D) -> Result<Option<ContainerName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    validated_option(deserializer, ContainerName::new)
}
