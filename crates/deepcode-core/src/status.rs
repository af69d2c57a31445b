//! Indexing job status as reported by the backend

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an indexing job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexStatus {
    /// Queued
    Pending,
    /// Running
    InProgress,
    /// Finished, every file indexed
    Completed,
    /// Finished, some files failed
    CompletedWithErrors,
    /// Aborted
    Failed,
}

impl IndexStatus {
    /// No further status changes will follow
    pub fn is_terminal(self) -> bool {
        !matches!(self, IndexStatus::Pending | IndexStatus::InProgress)
    }

    /// Terminal and usable
    pub fn is_success(self) -> bool {
        matches!(
            self,
            IndexStatus::Completed | IndexStatus::CompletedWithErrors
        )
    }

    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            IndexStatus::Pending => "PENDING",
            IndexStatus::InProgress => "IN_PROGRESS",
            IndexStatus::Completed => "COMPLETED",
            IndexStatus::CompletedWithErrors => "COMPLETED_WITH_ERRORS",
            IndexStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for IndexStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of `GET /api/index/status/{projectId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatusResponse {
    /// Project being indexed
    pub project_id: String,
    /// Current state
    pub status: IndexStatus,
    /// Files considered
    #[serde(default)]
    pub total_files: u64,
    /// Files embedded so far
    #[serde(default)]
    pub indexed_files: u64,
    /// Files that failed
    #[serde(default)]
    pub failed_files: u64,
    /// Chunks written
    #[serde(default)]
    pub total_chunks: u64,
    /// 0 to 100
    #[serde(default)]
    pub progress: f64,
    /// Human readable progress line
    #[serde(default)]
    pub message: String,
    /// Embedding model in use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_model: Option<String>,
    /// Chunk size in use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u32>,
    /// Chunk overlap in use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_overlap: Option<u32>,
    /// Failure detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Start timestamp as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Completion timestamp as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl IndexStatusResponse {
    /// Progress rounded and clamped to 0..=100
    pub fn percent(&self) -> u8 {
        if self.progress.is_nan() {
            return 0;
        }
        self.progress.round().clamp(0.0, 100.0) as u8
    }

    /// Failure detail, falling back to the progress message
    pub fn failure_message(&self) -> &str {
        self.error_message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.message)
    }
}
