// ABOUTME: Test support utilities.
// ABOUTME: Provides an in-memory cloud provider and project fixtures for integration tests.

use async_trait::async_trait;
use funcship::cloud::{
    Account, AuthOps, CloudError, FunctionAppInfo, FunctionAppOps, FunctionAppSpec,
    ObjectStoreOps, PublishOps, PublishRequest, ResourceGroupInfo, ResourceGroupOps,
    SettingsOps, StorageAccountInfo, StorageAccountSpec, StorageOps,
};
use funcship::config::{ConfigFile, DeploymentConfig};
use funcship::deploy::CancelFlag;
use funcship::types::{
    ContainerName, FunctionAppName, Location, ResourceGroupName, Runtime, StorageAccountName,
};
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Once;
use std::time::Duration;
use tempfile::TempDir;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("funcship=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// An app as the fake control plane stores it.
#[derive(Debug, Clone)]
pub struct FakeApp {
    pub resource_group: String,
    pub runtime: Option<(Runtime, String)>,
}

/// Remote state plus knobs for injecting failures.
#[derive(Debug, Default)]
pub struct FakeState {
    pub logged_in: bool,
    pub login_works: bool,
    pub login_calls: u32,

    /// Resource group name -> location.
    pub resource_groups: BTreeMap<String, String>,
    /// Storage account name -> owning resource group.
    pub storage_accounts: BTreeMap<String, String>,
    /// Names held by some other tenant.
    pub foreign_storage_names: BTreeSet<String>,
    pub containers: BTreeSet<String>,
    /// "container/blob" -> contents.
    pub blobs: BTreeMap<String, Vec<u8>>,
    /// Every upload in call order: (blob name, overwrite).
    pub upload_log: Vec<(String, bool)>,
    /// Blob name whose upload is refused.
    pub fail_upload: Option<String>,
    pub apps: BTreeMap<String, FakeApp>,
    pub settings: BTreeMap<String, String>,

    pub credential_calls: u32,
    pub transient_credential_failures: u32,
    pub publish_calls: u32,
    pub transient_publish_failures: u32,
    pub publish_delay: Option<Duration>,
    pub published_from: Vec<String>,

    /// Number of create calls per resource kind.
    pub creates: BTreeMap<&'static str, u32>,

    /// Flag tripped while the resource group step runs.
    pub cancel_during_resource_group: Option<CancelFlag>,
}

/// In-memory stand-in for the cloud control plane.
#[derive(Debug)]
pub struct FakeCloud {
    pub state: Mutex<FakeState>,
}

impl Default for FakeCloud {
    fn default() -> Self {
        Self {
            state: Mutex::new(FakeState {
                logged_in: true,
                login_works: true,
                ..FakeState::default()
            }),
        }
    }
}

#[allow(dead_code)]
impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn creates(&self, kind: &str) -> u32 {
        self.state.lock().creates.get(kind).copied().unwrap_or(0)
    }

    pub fn uploaded(&self) -> Vec<(String, bool)> {
        self.state.lock().upload_log.clone()
    }

    fn count_create(&self, kind: &'static str) {
        *self.state.lock().creates.entry(kind).or_default() += 1;
    }

    fn require_login(&self) -> Result<(), CloudError> {
        if self.state.lock().logged_in {
            Ok(())
        } else {
            Err(CloudError::Unauthenticated("please run login".to_string()))
        }
    }
}

#[async_trait]
impl AuthOps for FakeCloud {
    async fn current_account(&self) -> Result<Option<Account>, CloudError> {
        let state = self.state.lock();
        Ok(state.logged_in.then(|| Account {
            subscription_id: "00000000-0000-0000-0000-000000000000".to_string(),
            subscription_name: "test-subscription".to_string(),
            user: Some("dev@example.com".to_string()),
        }))
    }

    async fn login(&self) -> Result<(), CloudError> {
        let mut state = self.state.lock();
        state.login_calls += 1;
        if state.login_works {
            state.logged_in = true;
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceGroupOps for FakeCloud {
    async fn resource_group(
        &self,
        name: &ResourceGroupName,
    ) -> Result<Option<ResourceGroupInfo>, CloudError> {
        self.require_login()?;
        let state = self.state.lock();
        if let Some(flag) = &state.cancel_during_resource_group {
            flag.cancel();
        }
        Ok(state
            .resource_groups
            .get(name.as_str())
            .map(|location| ResourceGroupInfo {
                name: name.to_string(),
                location: location.clone(),
            }))
    }

    async fn create_resource_group(
        &self,
        name: &ResourceGroupName,
        location: &Location,
    ) -> Result<ResourceGroupInfo, CloudError> {
        self.count_create("resource-group");
        self.state
            .lock()
            .resource_groups
            .insert(name.to_string(), location.to_string());
        Ok(ResourceGroupInfo {
            name: name.to_string(),
            location: location.to_string(),
        })
    }
}

#[async_trait]
impl StorageOps for FakeCloud {
    async fn storage_account(
        &self,
        name: &StorageAccountName,
        resource_group: &ResourceGroupName,
    ) -> Result<Option<StorageAccountInfo>, CloudError> {
        let state = self.state.lock();
        Ok(state
            .storage_accounts
            .get(name.as_str())
            .filter(|rg| rg.as_str() == resource_group.as_str())
            .map(|rg| StorageAccountInfo {
                name: name.to_string(),
                resource_group: rg.clone(),
                location: "westeurope".to_string(),
            }))
    }

    async fn create_storage_account(
        &self,
        spec: &StorageAccountSpec,
    ) -> Result<StorageAccountInfo, CloudError> {
        self.count_create("storage-account");
        let mut state = self.state.lock();
        let name = spec.name.to_string();
        if state.foreign_storage_names.contains(&name) || state.storage_accounts.contains_key(&name)
        {
            return Err(CloudError::NameUnavailable {
                name,
                reason: "AlreadyExists".to_string(),
            });
        }
        state
            .storage_accounts
            .insert(name.clone(), spec.resource_group.to_string());
        Ok(StorageAccountInfo {
            name,
            resource_group: spec.resource_group.to_string(),
            location: spec.location.to_string(),
        })
    }

    async fn connection_string(
        &self,
        name: &StorageAccountName,
        _resource_group: &ResourceGroupName,
    ) -> Result<SecretString, CloudError> {
        let mut state = self.state.lock();
        state.credential_calls += 1;
        if state.transient_credential_failures > 0 {
            state.transient_credential_failures -= 1;
            return Err(CloudError::Transient("account keys not ready".to_string()));
        }
        Ok(SecretString::from(format!(
            "DefaultEndpointsProtocol=https;AccountName={name};AccountKey=ZmFrZQ=="
        )))
    }
}

#[async_trait]
impl ObjectStoreOps for FakeCloud {
    async fn ensure_container(
        &self,
        connection: &SecretString,
        container: &ContainerName,
    ) -> Result<bool, CloudError> {
        assert!(connection.expose_secret().contains("AccountKey"));
        Ok(self.state.lock().containers.insert(container.to_string()))
    }

    async fn upload_blob(
        &self,
        _connection: &SecretString,
        container: &ContainerName,
        blob_name: &str,
        source: &Path,
        overwrite: bool,
    ) -> Result<(), CloudError> {
        let bytes = std::fs::read(source).map_err(|source_err| CloudError::LocalFile {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let mut state = self.state.lock();
        if state.fail_upload.as_deref() == Some(blob_name) {
            return Err(CloudError::Transient(format!(
                "connection reset while uploading {blob_name}"
            )));
        }
        let key = format!("{container}/{blob_name}");
        if !overwrite && state.blobs.contains_key(&key) {
            return Err(CloudError::Conflict(format!("blob {key} exists")));
        }
        state.blobs.insert(key, bytes);
        state.upload_log.push((blob_name.to_string(), overwrite));
        Ok(())
    }
}

#[async_trait]
impl FunctionAppOps for FakeCloud {
    async fn function_app(
        &self,
        name: &FunctionAppName,
        resource_group: &ResourceGroupName,
    ) -> Result<Option<FunctionAppInfo>, CloudError> {
        let state = self.state.lock();
        Ok(state
            .apps
            .get(name.as_str())
            .filter(|app| app.resource_group == resource_group.as_str())
            .map(|app| FunctionAppInfo {
                name: name.to_string(),
                default_host_name: format!("{name}.azurewebsites.net"),
                runtime: app.runtime.clone(),
            }))
    }

    async fn create_function_app(
        &self,
        spec: &FunctionAppSpec,
    ) -> Result<FunctionAppInfo, CloudError> {
        self.count_create("function-app");
        let runtime = Some((spec.runtime, spec.runtime_version.as_str().to_string()));
        self.state.lock().apps.insert(
            spec.name.to_string(),
            FakeApp {
                resource_group: spec.resource_group.to_string(),
                runtime: runtime.clone(),
            },
        );
        Ok(FunctionAppInfo {
            name: spec.name.to_string(),
            default_host_name: format!("{}.azurewebsites.net", spec.name),
            runtime,
        })
    }
}

#[async_trait]
impl SettingsOps for FakeCloud {
    async fn apply_settings(
        &self,
        _app: &FunctionAppName,
        _resource_group: &ResourceGroupName,
        settings: &BTreeMap<String, SecretString>,
    ) -> Result<(), CloudError> {
        let mut state = self.state.lock();
        for (key, value) in settings {
            state
                .settings
                .insert(key.clone(), value.expose_secret().to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl PublishOps for FakeCloud {
    async fn publish(&self, request: &PublishRequest) -> Result<(), CloudError> {
        let delay = {
            let mut state = self.state.lock();
            state.publish_calls += 1;
            if state.transient_publish_failures > 0 {
                state.transient_publish_failures -= 1;
                return Err(CloudError::Transient("502 Bad Gateway".to_string()));
            }
            state.publish_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.state
            .lock()
            .published_from
            .push(request.source_dir.display().to_string());
        Ok(())
    }
}

/// Base config used by most tests; artifacts live in `fixtures/`.
#[allow(dead_code)]
pub const EXAMPLE_CONFIG: &str = r#"
resourceGroup: rg-test
location: westeurope
storageAccountName: sttest001
functionAppName: func-test
containerName: data
artifactDirectory: fixtures
runtime: python
runtimeVersion: "3.11"
appDirectory: app
stepTimeout: 5s
retry:
  credentialAttempts: 4
  publishRetries: 2
  initialBackoff: 1ms
  maxBackoff: 2ms
"#;

/// A project directory with `fixtures/a.csv`, `fixtures/b.pickle` and an `app/` dir.
#[allow(dead_code)]
pub fn example_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let fixtures = dir.path().join("fixtures");
    std::fs::create_dir_all(&fixtures).unwrap();
    std::fs::write(fixtures.join("a.csv"), "user_id,article_id\n1,42\n").unwrap();
    std::fs::write(fixtures.join("b.pickle"), [0x80u8, 0x04, 0x95]).unwrap();
    std::fs::create_dir_all(dir.path().join("app")).unwrap();
    std::fs::write(dir.path().join("app/host.json"), "{}").unwrap();
    dir
}

/// Resolve `yaml` with relative paths anchored at `dir`.
#[allow(dead_code)]
pub fn config_in(dir: &Path, yaml: &str) -> DeploymentConfig {
    let mut file = ConfigFile::from_yaml(yaml).unwrap();
    file.base_dir = dir.to_path_buf();
    file.resolve(None).unwrap()
}
