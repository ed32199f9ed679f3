// ABOUTME: Provider region code validated against the set of known regions.
// ABOUTME: Accepts display-style input ("West Europe") and normalizes it to "westeurope".

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Region codes accepted for resource placement.
pub const KNOWN_LOCATIONS: &[&str] = &[
    "australiaeast",
    "australiasoutheast",
    "brazilsouth",
    "canadacentral",
    "canadaeast",
    "centralindia",
    "centralus",
    "eastasia",
    "eastus",
    "eastus2",
    "francecentral",
    "germanywestcentral",
    "italynorth",
    "japaneast",
    "japanwest",
    "koreacentral",
    "northcentralus",
    "northeurope",
    "norwayeast",
    "polandcentral",
    "southafricanorth",
    "southcentralus",
    "southeastasia",
    "southindia",
    "swedencentral",
    "switzerlandnorth",
    "uaenorth",
    "uksouth",
    "ukwest",
    "westcentralus",
    "westeurope",
    "westus",
    "westus2",
    "westus3",
];

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location cannot be empty")]
    Empty,

    #[error("unknown location: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location(String);

impl Location {
    pub fn new(value: &str) -> Result<Self, LocationError> {
        let normalized: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(LocationError::Empty);
        }

        if !KNOWN_LOCATIONS.contains(&normalized.as_str()) {
            return Err(LocationError::Unknown(value.to_string()));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_display_names() {
        let location = Location::new("West Europe").unwrap();
        assert_eq!(location.as_str(), "westeurope");
    }

    #[test]
    fn rejects_unknown_regions() {
        assert!(matches!(
            Location::new("atlantis"),
            Err(LocationError::Unknown(_))
        ));
    }

    #[test]
    fn rejects_blank_input() {
        assert!(matches!(Location::new("  "), Err(LocationError::Empty)));
    }
}
