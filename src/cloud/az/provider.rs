// ABOUTME: AzureCli implements every capability trait on top of `az` and `func`.
// ABOUTME: Existence checks map NotFound to None so callers can create-or-reuse.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::Path;

use super::command::CliRunner;

/// Read by `az storage` commands in place of `--connection-string`.
const STORAGE_CONNECTION_ENV: &str = "AZURE_STORAGE_CONNECTION_STRING";
use crate::cloud::CloudError;
use crate::cloud::traits::{
    Account, AuthOps, FunctionAppInfo, FunctionAppOps, FunctionAppSpec, ObjectStoreOps,
    PublishOps, PublishRequest, ResourceGroupInfo, ResourceGroupOps, SettingsOps,
    StorageAccountInfo, StorageAccountSpec, StorageOps,
};
use crate::types::{
    ContainerName, FunctionAppName, Location, ResourceGroupName, Runtime, StorageAccountName,
};

/// Azure provider driven through the `az` CLI and Azure Functions Core Tools.
#[derive(Debug, Clone)]
pub struct AzureCli {
    az: CliRunner,
    func: CliRunner,
}

impl Default for AzureCli {
    fn default() -> Self {
        Self::new("az", "func")
    }
}

impl AzureCli {
    pub fn new(az: impl Into<std::path::PathBuf>, func: impl Into<std::path::PathBuf>) -> Self {
        Self {
            az: CliRunner::new(az),
            func: CliRunner::new(func),
        }
    }
}

/// Turn a NotFound into `None` for lookups.
fn optional<T>(result: Result<T, CloudError>) -> Result<Option<T>, CloudError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(CloudError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// One entry of the `appsettings set --settings @file` JSON format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingJson<'a> {
    name: &'a str,
    value: &'a str,
    slot_setting: bool,
}

/// Write settings to an owner-only temp file, removed when dropped.
fn settings_file(
    settings: &BTreeMap<String, SecretString>,
) -> Result<tempfile::NamedTempFile, CloudError> {
    let entries: Vec<SettingJson<'_>> = settings
        .iter()
        .map(|(name, value)| SettingJson {
            name,
            value: value.expose_secret(),
            slot_setting: false,
        })
        .collect();
    let local = |source| CloudError::LocalFile {
        path: std::env::temp_dir(),
        source,
    };

    let mut file = tempfile::Builder::new()
        .prefix("funcship-settings-")
        .suffix(".json")
        .tempfile()
        .map_err(local)?;
    serde_json::to_writer(&mut file, &entries).map_err(|e| local(e.into()))?;
    file.flush().map_err(local)?;
    Ok(file)
}

#[derive(Debug, Deserialize)]
struct AccountJson {
    id: String,
    name: String,
    #[serde(default)]
    user: Option<UserJson>,
}

#[derive(Debug, Deserialize)]
struct UserJson {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GroupJson {
    name: String,
    location: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageAccountJson {
    name: String,
    location: String,
    resource_group: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameCheckJson {
    name_available: bool,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionStringJson {
    connection_string: String,
}

#[derive(Debug, Deserialize)]
struct ContainerCreateJson {
    created: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionAppJson {
    name: String,
    default_host_name: String,
    #[serde(default)]
    site_config: Option<SiteConfigJson>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteConfigJson {
    #[serde(default)]
    linux_fx_version: Option<String>,
}

impl SiteConfigJson {
    fn runtime(&self) -> Option<(Runtime, String)> {
        self.linux_fx_version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .and_then(Runtime::parse_stack)
    }
}

#[async_trait]
impl AuthOps for AzureCli {
    async fn current_account(&self) -> Result<Option<Account>, CloudError> {
        match self.az.json::<AccountJson>(&["account", "show"]).await {
            Ok(account) => Ok(Some(Account {
                subscription_id: account.id,
                subscription_name: account.name,
                user: account.user.map(|u| u.name),
            })),
            Err(e) => match CloudError::from(e) {
                CloudError::Unauthenticated(_) => Ok(None),
                other => Err(other),
            },
        }
    }

    async fn login(&self) -> Result<(), CloudError> {
        self.az
            .interactive(&["login"])
            .await
            .map_err(|e| CloudError::Unauthenticated(e.to_string()))
    }
}

#[async_trait]
impl ResourceGroupOps for AzureCli {
    async fn resource_group(
        &self,
        name: &ResourceGroupName,
    ) -> Result<Option<ResourceGroupInfo>, CloudError> {
        let result = self
            .az
            .json::<GroupJson>(&["group", "show", "--name", name.as_str()])
            .await
            .map_err(CloudError::from);
        Ok(optional(result)?.map(|g| ResourceGroupInfo {
            name: g.name,
            location: g.location,
        }))
    }

    async fn create_resource_group(
        &self,
        name: &ResourceGroupName,
        location: &Location,
    ) -> Result<ResourceGroupInfo, CloudError> {
        let group: GroupJson = self
            .az
            .json(&[
                "group",
                "create",
                "--name",
                name.as_str(),
                "--location",
                location.as_str(),
            ])
            .await?;
        Ok(ResourceGroupInfo {
            name: group.name,
            location: group.location,
        })
    }
}

#[async_trait]
impl StorageOps for AzureCli {
    async fn storage_account(
        &self,
        name: &StorageAccountName,
        resource_group: &ResourceGroupName,
    ) -> Result<Option<StorageAccountInfo>, CloudError> {
        let result = self
            .az
            .json::<StorageAccountJson>(&[
                "storage",
                "account",
                "show",
                "--name",
                name.as_str(),
                "--resource-group",
                resource_group.as_str(),
            ])
            .await
            .map_err(CloudError::from);
        Ok(optional(result)?.map(|a| StorageAccountInfo {
            name: a.name,
            resource_group: a.resource_group,
            location: a.location,
        }))
    }

    async fn create_storage_account(
        &self,
        spec: &StorageAccountSpec,
    ) -> Result<StorageAccountInfo, CloudError> {
        let check: NameCheckJson = self
            .az
            .json(&["storage", "account", "check-name", "--name", spec.name.as_str()])
            .await?;
        if !check.name_available {
            return Err(CloudError::NameUnavailable {
                name: spec.name.to_string(),
                reason: check
                    .message
                    .or(check.reason)
                    .unwrap_or_else(|| "name is not available".to_string()),
            });
        }

        let account: StorageAccountJson = self
            .az
            .json(&[
                "storage",
                "account",
                "create",
                "--name",
                spec.name.as_str(),
                "--resource-group",
                spec.resource_group.as_str(),
                "--location",
                spec.location.as_str(),
                "--sku",
                spec.sku.as_str(),
                "--kind",
                "StorageV2",
            ])
            .await
            .map_err(|e| match CloudError::from(e) {
                CloudError::NameUnavailable { reason, .. } => CloudError::NameUnavailable {
                    name: spec.name.to_string(),
                    reason,
                },
                other => other,
            })?;

        Ok(StorageAccountInfo {
            name: account.name,
            resource_group: account.resource_group,
            location: account.location,
        })
    }

    async fn connection_string(
        &self,
        name: &StorageAccountName,
        resource_group: &ResourceGroupName,
    ) -> Result<SecretString, CloudError> {
        let result: Result<ConnectionStringJson, CloudError> = self
            .az
            .json(&[
                "storage",
                "account",
                "show-connection-string",
                "--name",
                name.as_str(),
                "--resource-group",
                resource_group.as_str(),
            ])
            .await
            .map_err(CloudError::from);

        match result {
            Ok(json) if json.connection_string.trim().is_empty() => Err(CloudError::Transient(
                format!("empty connection string returned for {name}"),
            )),
            Ok(json) => Ok(SecretString::from(json.connection_string)),
            // Freshly created accounts are briefly invisible to the keys API.
            Err(CloudError::NotFound(msg)) => Err(CloudError::Transient(msg)),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ObjectStoreOps for AzureCli {
    async fn ensure_container(
        &self,
        connection: &SecretString,
        container: &ContainerName,
    ) -> Result<bool, CloudError> {
        let created: ContainerCreateJson = self
            .az
            .with_secret_env(STORAGE_CONNECTION_ENV, connection)
            .json(&[
                "storage",
                "container",
                "create",
                "--name",
                container.as_str(),
            ])
            .await?;
        Ok(created.created)
    }

    async fn upload_blob(
        &self,
        connection: &SecretString,
        container: &ContainerName,
        blob_name: &str,
        source: &Path,
        overwrite: bool,
    ) -> Result<(), CloudError> {
        tokio::fs::metadata(source)
            .await
            .map_err(|e| CloudError::LocalFile {
                path: source.to_path_buf(),
                source: e,
            })?;

        let file = source.to_string_lossy();
        self.az
            .with_secret_env(STORAGE_CONNECTION_ENV, connection)
            .run(&[
                "storage",
                "blob",
                "upload",
                "--container-name",
                container.as_str(),
                "--name",
                blob_name,
                "--file",
                file.as_ref(),
                "--overwrite",
                if overwrite { "true" } else { "false" },
                "--no-progress",
                "--only-show-errors",
            ])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl FunctionAppOps for AzureCli {
    async fn function_app(
        &self,
        name: &FunctionAppName,
        resource_group: &ResourceGroupName,
    ) -> Result<Option<FunctionAppInfo>, CloudError> {
        let args = [
            "functionapp",
            "show",
            "--name",
            name.as_str(),
            "--resource-group",
            resource_group.as_str(),
        ];
        let result = self
            .az
            .json::<FunctionAppJson>(&args)
            .await
            .map_err(CloudError::from);
        let Some(app) = optional(result)? else {
            return Ok(None);
        };

        let mut runtime = app.site_config.unwrap_or_default().runtime();
        if runtime.is_none() {
            // `functionapp show` omits the stack on some API versions.
            let site: SiteConfigJson = self
                .az
                .json(&[
                    "functionapp",
                    "config",
                    "show",
                    "--name",
                    name.as_str(),
                    "--resource-group",
                    resource_group.as_str(),
                ])
                .await?;
            runtime = site.runtime();
        }

        Ok(Some(FunctionAppInfo {
            name: app.name,
            default_host_name: app.default_host_name,
            runtime,
        }))
    }

    async fn create_function_app(
        &self,
        spec: &FunctionAppSpec,
    ) -> Result<FunctionAppInfo, CloudError> {
        let app: FunctionAppJson = self
            .az
            .json(&[
                "functionapp",
                "create",
                "--name",
                spec.name.as_str(),
                "--resource-group",
                spec.resource_group.as_str(),
                "--storage-account",
                spec.storage_account.as_str(),
                "--consumption-plan-location",
                spec.location.as_str(),
                "--runtime",
                spec.runtime.as_str(),
                "--runtime-version",
                spec.runtime_version.as_str(),
                "--functions-version",
                spec.functions_version.as_str(),
                "--os-type",
                "Linux",
            ])
            .await?;

        let runtime = app
            .site_config
            .unwrap_or_default()
            .runtime()
            .or_else(|| Some((spec.runtime, spec.runtime_version.to_string())));

        Ok(FunctionAppInfo {
            name: app.name,
            default_host_name: app.default_host_name,
            runtime,
        })
    }
}

#[async_trait]
impl SettingsOps for AzureCli {
    async fn apply_settings(
        &self,
        app: &FunctionAppName,
        resource_group: &ResourceGroupName,
        settings: &BTreeMap<String, SecretString>,
    ) -> Result<(), CloudError> {
        if settings.is_empty() {
            return Ok(());
        }

        // Values can be secrets, so they go through a private file instead of argv.
        let file = settings_file(settings)?;
        let settings_arg = format!("@{}", file.path().display());

        let args = [
            "functionapp",
            "config",
            "appsettings",
            "set",
            "--name",
            app.as_str(),
            "--resource-group",
            resource_group.as_str(),
            "--output",
            "none",
            "--settings",
            settings_arg.as_str(),
        ];

        self.az.run(&args).await?;
        Ok(())
    }
}

#[async_trait]
impl PublishOps for AzureCli {
    async fn publish(&self, request: &PublishRequest) -> Result<(), CloudError> {
        let mut args = vec!["azure", "functionapp", "publish", request.app.as_str()];
        if let Some(flag) = request.runtime.publish_flag() {
            args.push(flag);
        }

        self.func
            .run_in(&args, Some(request.source_dir.as_path()))
            .await?;
        Ok(())
    }
}
