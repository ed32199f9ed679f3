// ABOUTME: Resolves which local files are uploaded as artifacts, and in what order.
// ABOUTME: Declared lists keep their order; discovered files are sorted by name.

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::error::DeployError;
use crate::config::DeploymentConfig;

/// A local file and the blob name it is uploaded as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub local_path: PathBuf,
    pub remote_name: String,
}

/// What the upload step will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactPlan {
    /// Nothing to upload; the reason is surfaced as a warning.
    Skip(String),
    Upload(Vec<Artifact>),
}

/// Work out the upload list without touching the network.
///
/// Every declared artifact must exist before any upload starts.
pub fn resolve_artifacts(config: &DeploymentConfig) -> Result<ArtifactPlan, DeployError> {
    let Some(dir) = config.artifact_directory.as_deref() else {
        return Ok(ArtifactPlan::Skip(
            "no artifactDirectory configured".to_string(),
        ));
    };

    if let Some(ref declared) = config.artifacts {
        let artifacts = declared
            .iter()
            .map(|name| {
                let local_path = dir.join(name);
                if local_path.is_file() {
                    Ok(Artifact {
                        local_path,
                        remote_name: name.clone(),
                    })
                } else {
                    Err(DeployError::MissingArtifact(local_path))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(ArtifactPlan::Upload(artifacts));
    }

    if !dir.is_dir() {
        return Ok(ArtifactPlan::Skip(format!(
            "artifact directory {} does not exist",
            dir.display()
        )));
    }

    let artifacts = discover(dir)?;
    if artifacts.is_empty() {
        return Ok(ArtifactPlan::Skip(format!(
            "artifact directory {} is empty",
            dir.display()
        )));
    }

    Ok(ArtifactPlan::Upload(artifacts))
}

fn discover(dir: &Path) -> Result<Vec<Artifact>, DeployError> {
    let read_err = |e: std::io::Error| {
        DeployError::ConfigValidation(format!("cannot read {}: {e}", dir.display()))
    };

    let mut artifacts = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Err(DeployError::ConfigValidation(format!(
                "artifact file name is not valid UTF-8: {}",
                path.display()
            )));
        };
        artifacts.push(Artifact {
            remote_name: name.to_string(),
            local_path: path.clone(),
        });
    }

    artifacts.sort_by(|a, b| a.remote_name.cmp(&b.remote_name));
    Ok(artifacts)
}
