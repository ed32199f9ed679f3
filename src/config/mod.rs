// ABOUTME: Configuration types and parsing for funcship.yml.
// ABOUTME: Handles YAML parsing, destination merging, env interpolation and validation.

mod deserialize;
mod env_value;
mod init;
mod retry;

pub use env_value::{EnvValue, resolve_settings};
pub use init::init_config;
pub use retry::RetryConfig;

use crate::error::{Error, Result};
use crate::types::{
    ContainerName, FunctionAppName, Location, ResourceGroupName, Runtime, RuntimeVersion,
    StorageAccountName, StorageSku,
};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "funcship.yml";
pub const CONFIG_FILENAME_ALT: &str = "funcship.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".funcship/config.yml";

/// Functions host versions the control plane still provisions.
pub const SUPPORTED_FUNCTIONS_VERSIONS: &[&str] = &["4"];

/// The configuration file as written on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    #[serde(deserialize_with = "deserialize::resource_group")]
    pub resource_group: ResourceGroupName,

    #[serde(deserialize_with = "deserialize::location")]
    pub location: Location,

    #[serde(deserialize_with = "deserialize::storage_account")]
    pub storage_account_name: StorageAccountName,

    #[serde(default)]
    pub storage_sku: StorageSku,

    #[serde(deserialize_with = "deserialize::function_app")]
    pub function_app_name: FunctionAppName,

    #[serde(deserialize_with = "deserialize::container")]
    pub container_name: ContainerName,

    #[serde(default)]
    pub artifact_directory: Option<PathBuf>,

    #[serde(default)]
    pub artifacts: Option<NonEmpty<String>>,

    #[serde(default)]
    pub runtime: Runtime,

    pub runtime_version: String,

    #[serde(default = "default_functions_version")]
    pub functions_version: String,

    #[serde(default = "default_app_directory")]
    pub app_directory: PathBuf,

    #[serde(default)]
    pub settings: BTreeMap<String, EnvValue>,

    #[serde(default)]
    pub routes: Vec<String>,

    #[serde(default = "default_step_timeout", with = "humantime_serde")]
    pub step_timeout: Duration,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Named overrides merged over the base configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    #[serde(default, deserialize_with = "deserialize::resource_group_option")]
    pub resource_group: Option<ResourceGroupName>,

    #[serde(default, deserialize_with = "deserialize::location_option")]
    pub location: Option<Location>,

    #[serde(default, deserialize_with = "deserialize::storage_account_option")]
    pub storage_account_name: Option<StorageAccountName>,

    #[serde(default, deserialize_with = "deserialize::function_app_option")]
    pub function_app_name: Option<FunctionAppName>,

    #[serde(default, deserialize_with = "deserialize::container_option")]
    pub container_name: Option<ContainerName>,

    #[serde(default)]
    pub artifact_directory: Option<PathBuf>,

    #[serde(default)]
    pub settings: BTreeMap<String, EnvValue>,

    #[serde(default)]
    pub routes: Option<Vec<String>>,
}

fn default_functions_version() -> String {
    "4".to_string()
}

fn default_app_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_step_timeout() -> Duration {
    Duration::from_secs(600)
}

/// Fully resolved, validated deployment configuration.
///
/// Built once from a [`ConfigFile`] and never mutated afterwards; the
/// orchestrator only ever borrows it.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    pub resource_group: ResourceGroupName,
    pub location: Location,
    pub storage_account: StorageAccountName,
    pub storage_sku: StorageSku,
    pub function_app: FunctionAppName,
    pub container: ContainerName,
    pub artifact_directory: Option<PathBuf>,
    pub artifacts: Option<NonEmpty<String>>,
    pub runtime: Runtime,
    pub runtime_version: RuntimeVersion,
    pub functions_version: String,
    pub app_directory: PathBuf,
    pub settings: BTreeMap<String, String>,
    pub routes: Vec<String>,
    pub step_timeout: Duration,
    pub retry: RetryConfig,
    pub destination: Option<String>,
}

impl ConfigFile {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        let mut file = Self::from_yaml(&content)?;
        file.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(file)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Load from an explicit path, or discover in `dir` when none is given.
    pub fn locate(path: Option<&Path>, dir: &Path) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::discover(dir),
        }
    }

    pub fn for_destination(&self, name: &str) -> Result<ConfigFile> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref rg) = dest.resource_group {
            merged.resource_group = rg.clone();
        }
        if let Some(ref location) = dest.location {
            merged.location = location.clone();
        }
        if let Some(ref account) = dest.storage_account_name {
            merged.storage_account_name = account.clone();
        }
        if let Some(ref app) = dest.function_app_name {
            merged.function_app_name = app.clone();
        }
        if let Some(ref container) = dest.container_name {
            merged.container_name = container.clone();
        }
        if dest.artifact_directory.is_some() {
            merged.artifact_directory = dest.artifact_directory.clone();
        }

        // Deep merge settings
        for (k, v) in &dest.settings {
            merged.settings.insert(k.clone(), v.clone());
        }

        if let Some(ref routes) = dest.routes {
            merged.routes = routes.clone();
        }

        Ok(merged)
    }

    /// Merge the optional destination, resolve env references and validate.
    pub fn resolve(&self, destination: Option<&str>) -> Result<DeploymentConfig> {
        let file = match destination {
            Some(name) => self.for_destination(name)?,
            None => self.clone(),
        };

        let runtime_version = RuntimeVersion::new(file.runtime, &file.runtime_version)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        if !SUPPORTED_FUNCTIONS_VERSIONS.contains(&file.functions_version.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "unsupported functionsVersion {} (supported: {})",
                file.functions_version,
                SUPPORTED_FUNCTIONS_VERSIONS.join(", ")
            )));
        }

        if let Some(ref artifacts) = file.artifacts {
            if file.artifact_directory.is_none() {
                return Err(Error::InvalidConfig(
                    "artifacts are listed but artifactDirectory is not set".to_string(),
                ));
            }
            for name in artifacts.iter() {
                validate_artifact_name(name)?;
            }
        }

        for key in file.settings.keys() {
            if key.is_empty() || key.contains('=') {
                return Err(Error::InvalidConfig(format!(
                    "invalid setting name: {key:?}"
                )));
            }
        }

        let routes = file
            .routes
            .iter()
            .map(|r| normalize_route(r))
            .collect::<Result<Vec<_>>>()?;

        if file.step_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "stepTimeout must be greater than zero".to_string(),
            ));
        }

        if file.retry.credential_attempts == 0 {
            return Err(Error::InvalidConfig(
                "retry.credentialAttempts must be at least 1".to_string(),
            ));
        }

        let settings = resolve_settings(&file.settings)?;

        Ok(DeploymentConfig {
            resource_group: file.resource_group,
            location: file.location,
            storage_account: file.storage_account_name,
            storage_sku: file.storage_sku,
            function_app: file.function_app_name,
            container: file.container_name,
            artifact_directory: file
                .artifact_directory
                .map(|dir| file.base_dir.join(dir)),
            artifacts: file.artifacts,
            runtime: file.runtime,
            runtime_version,
            functions_version: file.functions_version,
            app_directory: file.base_dir.join(&file.app_directory),
            settings,
            routes,
            step_timeout: file.step_timeout,
            retry: file.retry,
            destination: destination.map(str::to_string),
        })
    }
}

impl DeploymentConfig {
    /// Load, merge and validate in one go, including local paths.
    pub fn load(path: Option<&Path>, dir: &Path, destination: Option<&str>) -> Result<Self> {
        let config = ConfigFile::locate(path, dir)?.resolve(destination)?;
        config.check_local_paths()?;
        Ok(config)
    }

    /// Fail before any cloud call if the code to publish is missing.
    pub fn check_local_paths(&self) -> Result<()> {
        if !self.app_directory.is_dir() {
            return Err(Error::InvalidConfig(format!(
                "appDirectory {} does not exist or is not a directory",
                self.app_directory.display()
            )));
        }
        Ok(())
    }
}

/// Artifact names become blob names: plain file names only.
fn validate_artifact_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains('/')
        || trimmed.contains('\\')
    {
        return Err(Error::InvalidConfig(format!(
            "artifact must be a plain file name: {name:?}"
        )));
    }
    Ok(())
}

fn normalize_route(route: &str) -> Result<String> {
    let trimmed = route.trim().trim_matches('/');
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return Err(Error::InvalidConfig(format!("invalid route: {route:?}")));
    }
    Ok(trimmed.to_string())
}
