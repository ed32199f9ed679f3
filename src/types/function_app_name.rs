// ABOUTME: Function app name, which doubles as the app's public host label.
// ABOUTME: 2-60 characters, lowercase alphanumerics and hyphens.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FunctionAppNameError {
    #[error("function app name must be between 2 and 60 characters, got {0}")]
    InvalidLength(usize),

    #[error("function app name cannot start with a hyphen")]
    StartsWithHyphen,

    #[error("function app name cannot end with a hyphen")]
    EndsWithHyphen,

    #[error("function app name must be lowercase")]
    NotLowercase,

    #[error("invalid character in function app name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionAppName(String);

impl FunctionAppName {
    pub fn new(value: &str) -> Result<Self, FunctionAppNameError> {
        let len = value.chars().count();
        if !(2..=60).contains(&len) {
            return Err(FunctionAppNameError::InvalidLength(len));
        }

        if value.starts_with('-') {
            return Err(FunctionAppNameError::StartsWithHyphen);
        }

        if value.ends_with('-') {
            return Err(FunctionAppNameError::EndsWithHyphen);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(FunctionAppNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(FunctionAppNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionAppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
