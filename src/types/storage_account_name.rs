// ABOUTME: Globally unique storage account name.
// ABOUTME: 3-24 characters, lowercase letters and digits only.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageAccountNameError {
    #[error("storage account name must be between 3 and 24 characters, got {0}")]
    InvalidLength(usize),

    #[error("storage account name must be lowercase")]
    NotLowercase,

    #[error("invalid character in storage account name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StorageAccountName(String);

impl StorageAccountName {
    pub fn new(value: &str) -> Result<Self, StorageAccountNameError> {
        let len = value.chars().count();
        if !(3..=24).contains(&len) {
            return Err(StorageAccountNameError::InvalidLength(len));
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(StorageAccountNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() {
                return Err(StorageAccountNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageAccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_alphanumeric() {
        assert!(StorageAccountName::new("sttest001").is_ok());
    }

    #[test]
    fn rejects_hyphens() {
        assert!(matches!(
            StorageAccountName::new("st-test"),
            Err(StorageAccountNameError::InvalidChar('-'))
        ));
    }

    #[test]
    fn rejects_short_and_long_names() {
        assert!(matches!(
            StorageAccountName::new("ab"),
            Err(StorageAccountNameError::InvalidLength(2))
        ));
        assert!(StorageAccountName::new(&"a".repeat(25)).is_err());
    }
}
