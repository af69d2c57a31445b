//! Configuration resolution for the binary

use anyhow::{Context, Result};
use deepcode_config::ClientConfig;
use std::path::PathBuf;
use tracing::debug;

/// Load the config file and environment, then apply flag overrides
pub fn load(path: Option<PathBuf>, api_url: Option<String>) -> Result<ClientConfig> {
    let mut config = ClientConfig::load(path).context("failed to load configuration")?;
    if let Some(url) = api_url {
        config.backend.base_url = url;
        config.validate().context("invalid --api-url")?;
    }
    debug!(backend = %config.backend.base_url(), "configuration resolved");
    Ok(config)
}
