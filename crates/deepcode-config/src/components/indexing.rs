//! Indexing (embedding) settings

use super::defaults::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_EMBED_MODEL, DEFAULT_EMBED_MODELS,
    DEFAULT_POLL_INTERVAL_MS,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// When repository contents are embedded
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexMode {
    /// Fetch and embed everything at import time
    #[default]
    Preindex,
    /// Import structure only; the user picks files to index later
    Lazy,
}

impl IndexMode {
    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            IndexMode::Preindex => "PREINDEX",
            IndexMode::Lazy => "LAZY",
        }
    }
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indexing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexingConfig {
    /// Milliseconds between status polls while a job runs
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Preferred embedding model
    #[serde(default = "default_embed_model")]
    pub embed_model: String,
    /// Models offered when the backend cannot list its own
    #[serde(default = "default_embed_models")]
    pub embed_models: Vec<String>,
    /// Chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,
    /// Overlap between chunks in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: u32,
    /// Default indexing timing for GitHub imports
    #[serde(default)]
    pub index_mode: IndexMode,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_embed_model() -> String {
    DEFAULT_EMBED_MODEL.to_string()
}

fn default_embed_models() -> Vec<String> {
    DEFAULT_EMBED_MODELS.iter().map(|m| m.to_string()).collect()
}

fn default_chunk_size() -> u32 {
    DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> u32 {
    DEFAULT_CHUNK_OVERLAP
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            embed_model: default_embed_model(),
            embed_models: default_embed_models(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            index_mode: IndexMode::default(),
        }
    }
}

impl IndexingConfig {
    /// Poll interval as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
