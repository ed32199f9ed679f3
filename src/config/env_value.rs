// ABOUTME: Application setting values with environment variable interpolation.
// ABOUTME: A setting is either a literal or a reference to a local env var with optional default.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// Resolve the value for the setting named `key`.
    pub fn resolve(&self, key: &str) -> Result<String> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(val),
                Err(_) => default.clone().ok_or_else(|| Error::MissingEnvVar {
                    setting: key.to_string(),
                    var: var.clone(),
                }),
            },
        }
    }
}

/// Resolve every setting, failing on the first unresolvable reference.
pub fn resolve_settings(map: &BTreeMap<String, EnvValue>) -> Result<BTreeMap<String, String>> {
    map.iter()
        .map(|(k, v)| v.resolve(k).map(|resolved| (k.clone(), resolved)))
        .collect()
}
