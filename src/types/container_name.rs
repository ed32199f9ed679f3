// ABOUTME: Blob container name validation.
// ABOUTME: 3-63 lowercase letters, digits and single hyphens.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerNameError {
    #[error("container name must be between 3 and 63 characters, got {0}")]
    InvalidLength(usize),

    #[error("container name must start with a letter or digit")]
    InvalidStart,

    #[error("container name cannot end with a hyphen")]
    EndsWithHyphen,

    #[error("container name cannot contain consecutive hyphens")]
    ConsecutiveHyphens,

    #[error("invalid character in container name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(value: &str) -> Result<Self, ContainerNameError> {
        let len = value.chars().count();
        if !(3..=63).contains(&len) {
            return Err(ContainerNameError::InvalidLength(len));
        }

        for c in value.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(ContainerNameError::InvalidChar(c));
            }
        }

        if value.starts_with('-') {
            return Err(ContainerNameError::InvalidStart);
        }

        if value.ends_with('-') {
            return Err(ContainerNameError::EndsWithHyphen);
        }

        if value.contains("--") {
            return Err(ContainerNameError::ConsecutiveHyphens);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
