//! Chat defaults

use super::defaults::DEFAULT_TOP_K;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which workspace files accompany a chat message
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContextMode {
    /// Let the backend use everything it has for the user
    #[default]
    All,
    /// Only the files checked in the workspace tree
    Selected,
}

impl ContextMode {
    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            ContextMode::All => "all",
            ContextMode::Selected => "selected",
        }
    }
}

impl fmt::Display for ContextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatConfig {
    /// Chat model; the backend default is used when unset
    pub model: Option<String>,
    /// Chunks retrieved per RAG question
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Default context mode
    #[serde(default)]
    pub context_mode: ContextMode,
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: None,
            top_k: default_top_k(),
            context_mode: ContextMode::default(),
        }
    }
}
