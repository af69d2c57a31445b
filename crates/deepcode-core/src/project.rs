//! Imported project bookkeeping

use crate::tree::{FileNode, GithubMeta, ImportSource};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary shown in project lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Backend project id
    pub id: String,
    /// Where the project came from
    pub source: ImportSource,
    /// Human readable name
    pub display_name: String,
    /// Repository owner (GitHub only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Repository name (GitHub only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Branch (GitHub only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Sub path (GitHub only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
    /// Files in the tree snapshot
    pub file_count: usize,
    /// Epoch millis of the last import or refresh
    pub last_updated: i64,
}

impl ProjectSummary {
    /// Summary for a device batch
    pub fn device(id: impl Into<String>, file_count: usize) -> Self {
        Self {
            id: id.into(),
            source: ImportSource::Device,
            display_name: "Device files".to_string(),
            owner: None,
            repo: None,
            branch: None,
            sub_path: None,
            file_count,
            last_updated: Utc::now().timestamp_millis(),
        }
    }

    /// Summary for a GitHub import
    pub fn github(id: impl Into<String>, meta: &GithubMeta, file_count: usize) -> Self {
        Self {
            id: id.into(),
            source: ImportSource::Github,
            display_name: meta.full_name(),
            owner: Some(meta.owner.clone()),
            repo: Some(meta.repo.clone()),
            branch: meta.branch.clone(),
            sub_path: meta.sub_path.clone(),
            file_count,
            last_updated: Utc::now().timestamp_millis(),
        }
    }
}

/// Summary plus the tree snapshot taken at import time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectData {
    /// Summary
    pub summary: ProjectSummary,
    /// Tree snapshot
    pub tree: Vec<FileNode>,
}

/// In-memory project registry. Entries live until removed.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: HashMap<String, ProjectData>,
}

impl ProjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a project or replace the one with the same id
    pub fn add_or_update(&mut self, summary: ProjectSummary, tree: Vec<FileNode>) {
        tracing::debug!(
            project_id = %summary.id,
            files = summary.file_count,
            "project registered"
        );
        self.projects
            .insert(summary.id.clone(), ProjectData { summary, tree });
    }

    /// Drop a project
    pub fn remove(&mut self, id: &str) -> Option<ProjectData> {
        self.projects.remove(id)
    }

    /// Summaries, most recently updated first
    pub fn projects(&self) -> Vec<&ProjectSummary> {
        let mut list: Vec<_> = self.projects.values().map(|p| &p.summary).collect();
        list.sort_by(|a, b| b.last_updated.cmp(&a.last_updated).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// Summary for `id`
    pub fn get(&self, id: &str) -> Option<&ProjectSummary> {
        self.projects.get(id).map(|p| &p.summary)
    }

    /// Tree snapshot for `id`
    pub fn tree(&self, id: &str) -> Option<&[FileNode]> {
        self.projects.get(id).map(|p| p.tree.as_slice())
    }

    /// Full entry for `id`
    pub fn data(&self, id: &str) -> Option<&ProjectData> {
        self.projects.get(id)
    }

    /// Number of projects
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
