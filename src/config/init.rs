// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a commented funcship.yml starter file.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

/// Write a starter config into `dir` and return its path.
pub fn init_config(dir: &Path, app: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let app = app.unwrap_or("func-my-app");
    crate::types::FunctionAppName::new(app).map_err(|e| Error::InvalidConfig(e.to_string()))?;

    std::fs::write(&config_path, template_yaml(app))?;
    Ok(config_path)
}

fn template_yaml(app: &str) -> String {
    let storage: String = app
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(20)
        .collect();
    format!(
        r#"resourceGroup: rg-{app}
location: westeurope
storageAccountName: st{storage}
functionAppName: {app}
containerName: data
runtime: python
runtimeVersion: "3.11"

# Files uploaded to the container. When `artifacts` is omitted every file
# in the directory is uploaded in name order.
artifactDirectory: data
# artifacts:
#   - clicks.csv
#   - articles_metadata.csv

appDirectory: .

settings:
  LIMIT_DATA_SIZE: "false"

routes:
  - health
"#
    )
}
