// ABOUTME: Retry bounds for the steps allowed to retry transient failures.
// ABOUTME: Deserialized from the `retry` block of funcship.yml.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    /// Total attempts to fetch storage credentials right after account creation.
    #[serde(default = "default_credential_attempts")]
    pub credential_attempts: u32,

    /// Extra publish attempts after the first one fails transiently.
    #[serde(default = "default_publish_retries")]
    pub publish_retries: u32,

    #[serde(default = "default_initial_backoff", with = "humantime_serde")]
    pub initial_backoff: Duration,

    #[serde(default = "default_max_backoff", with = "humantime_serde")]
    pub max_backoff: Duration,
}

fn default_credential_attempts() -> u32 {
    5
}

fn default_publish_retries() -> u32 {
    2
}

fn default_initial_backoff() -> Duration {
    Duration::from_secs(2)
}

fn default_max_backoff() -> Duration {
    Duration::from_secs(30)
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            credential_attempts: default_credential_attempts(),
            publish_retries: default_publish_retries(),
            initial_backoff: default_initial_backoff(),
            max_backoff: default_max_backoff(),
        }
    }
}
