//! Loading and validating [`ClientConfig`]

use crate::components::{BackendConfig, ChatConfig, IndexingConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`ClientConfig`]
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend connection
    #[serde(default)]
    pub backend: BackendConfig,
    /// Indexing and polling
    #[serde(default)]
    pub indexing: IndexingConfig,
    /// Chat defaults
    #[serde(default)]
    pub chat: ChatConfig,
}

impl ClientConfig {
    /// Load configuration from `path` (or the default location), then apply
    /// `DEEPCODE_*` environment overrides and validate.
    ///
    /// A missing file is not an error: defaults are used instead.
    pub fn load(path: Option<PathBuf>) -> ConfigResult<Self> {
        let path = path.or_else(Self::default_config_path);
        let mut config = match path {
            Some(path) => Self::from_file_or_default(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file, falling back to defaults when it does not exist
    pub fn from_file_or_default(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply `DEEPCODE_*` environment variables on top of the current values
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("DEEPCODE_API_URL") {
            self.backend.base_url = url;
        }
        if let Ok(timeout) = std::env::var("DEEPCODE_TIMEOUT") {
            if let Ok(secs) = timeout.parse() {
                self.backend.timeout_secs = secs;
            }
        }
        if let Ok(model) = std::env::var("DEEPCODE_EMBED_MODEL") {
            self.indexing.embed_model = model;
        }
        if let Ok(model) = std::env::var("DEEPCODE_CHAT_MODEL") {
            self.chat.model = Some(model);
        }
        if let Ok(interval) = std::env::var("DEEPCODE_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.indexing.poll_interval_ms = ms;
            }
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("backend.base_url must not be empty".into()));
        }
        if self.indexing.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "indexing.poll_interval_ms must be greater than zero".into(),
            ));
        }
        if self.indexing.chunk_overlap >= self.indexing.chunk_size {
            return Err(ConfigError::Invalid(format!(
                "indexing.chunk_overlap ({}) must be smaller than indexing.chunk_size ({})",
                self.indexing.chunk_overlap, self.indexing.chunk_size
            )));
        }
        Ok(())
    }

    /// `<config_dir>/deepcode/config.toml`, if the platform has a config dir
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deepcode").join("config.toml"))
    }
}
