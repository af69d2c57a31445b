//! Backend connection settings

use super::defaults::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the deepcode backend lives and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    /// Base URL of the backend, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Base URL with any trailing slashes removed
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
