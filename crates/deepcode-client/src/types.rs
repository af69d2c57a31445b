//! Request and response bodies
//!
//! All bodies are JSON with camelCase keys. Optional response fields default
//! when absent or `null`.

use deepcode_config::{ContextMode, IndexMode};
use deepcode_core::{ContextFile, FileNode, GithubMeta};
use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// `GET /auth/me`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// Logged in to the backend
    #[serde(default)]
    pub authenticated: bool,
    /// GitHub token available
    #[serde(default)]
    pub github_authenticated: bool,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// GitHub
// ---------------------------------------------------------------------------

/// `GET /api/github/status`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubStatus {
    /// Whether a usable token exists
    #[serde(default)]
    pub connected: bool,
    /// Why not, when disconnected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// One entry of `GET /api/github/repos`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepoInfo {
    /// Repository name
    pub name: String,
    /// `owner/name`
    #[serde(default)]
    pub full_name: String,
    /// Default branch
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_branch: String,
    /// Private repository
    #[serde(default)]
    pub is_private: bool,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Last update timestamp
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Stars
    #[serde(default)]
    pub stargazers_count: u64,
    /// Primary language
    #[serde(default)]
    pub language: Option<String>,
}

impl GithubRepoInfo {
    /// Owner part of `full_name`
    pub fn owner(&self) -> Option<&str> {
        self.full_name.split_once('/').map(|(owner, _)| owner)
    }

    /// Case-insensitive substring match over name, full name and description.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle)
            || self.full_name.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// One entry of `GET /api/github/branches`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubBranch {
    /// Branch name
    pub name: String,
}

/// `POST /api/github/import`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubImportRequest {
    /// Owner
    pub owner: String,
    /// Repository
    pub repo: String,
    /// Branch; backend default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Directory to import
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_path: Option<String>,
    /// Index timing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_mode: Option<IndexMode>,
    /// Embedding model for pre-indexing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_model: Option<String>,
}

impl GithubImportRequest {
    /// Plain import of `meta`
    pub fn from_meta(meta: &GithubMeta) -> Self {
        Self {
            owner: meta.owner.clone(),
            repo: meta.repo.clone(),
            branch: meta.branch.clone(),
            sub_path: meta.sub_path.clone(),
            index_mode: None,
            embed_model: None,
        }
    }

    /// Metadata the resulting root carries
    pub fn meta(&self) -> GithubMeta {
        GithubMeta::new(
            &self.owner,
            &self.repo,
            self.branch.as_deref(),
            self.sub_path.as_deref(),
        )
    }
}

/// Project record returned by an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedProject {
    /// Backend project id
    pub id: String,
    /// Internal name
    #[serde(default)]
    pub name: Option<String>,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// `github`
    #[serde(default)]
    pub source: Option<String>,
    /// Owner
    #[serde(default)]
    pub github_owner: Option<String>,
    /// Repository
    #[serde(default)]
    pub github_repo: Option<String>,
    /// Branch actually imported
    #[serde(default)]
    pub github_branch: Option<String>,
    /// Files stored
    #[serde(default)]
    pub file_count: Option<usize>,
}

/// Response of `POST /api/github/import`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubImportResponse {
    /// The stored project
    pub project: ImportedProject,
    /// Imported tree, relative to `subPath`
    #[serde(default, deserialize_with = "null_as_default")]
    pub tree: Vec<FileNode>,
    /// Whether background indexing was started
    #[serde(default)]
    pub indexing_started: bool,
}

/// `GET /api/github/file`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubFileResponse {
    /// File name
    #[serde(default)]
    pub name: Option<String>,
    /// Path in the repository
    #[serde(default)]
    pub path: Option<String>,
    /// Blob sha
    #[serde(default)]
    pub sha: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    /// `file`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Encoded content
    #[serde(default)]
    pub content: Option<String>,
    /// Encoding of `content`, `base64` for GitHub
    #[serde(default)]
    pub encoding: Option<String>,
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// One entry of `GET /api/admin/models`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Model name, e.g. `nomic-embed-text:latest`
    pub name: String,
    /// Human readable size
    #[serde(default)]
    pub size: Option<String>,
    /// Modification time
    #[serde(default)]
    pub modified_at: Option<String>,
    /// Install status
    #[serde(default)]
    pub status: Option<String>,
    /// Enabled for chat
    #[serde(default)]
    pub active: bool,
}

impl ModelInfo {
    /// Whether the name looks like an embedding model
    pub fn is_embedding(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("embed") || name.contains("minilm")
    }
}

// ---------------------------------------------------------------------------
// Indexing
// ---------------------------------------------------------------------------

/// `POST /api/index/project`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRequest {
    /// Project to index
    pub project_id: String,
    /// All files or the selection
    pub mode: ContextMode,
    /// Selected files, for [`ContextMode::Selected`]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<ContextFile>,
    /// Embedding model
    pub embed_model: String,
    /// Characters per chunk
    pub chunk_size: u32,
    /// Characters shared by consecutive chunks
    pub chunk_overlap: u32,
}

/// Response of `POST /api/index/project`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStarted {
    /// Server message
    #[serde(default)]
    pub message: String,
    /// Project being indexed
    pub project_id: String,
    /// Files queued
    #[serde(default)]
    pub file_count: Option<usize>,
}

/// Response of `DELETE /api/index/project/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDeleted {
    /// Server message
    #[serde(default)]
    pub message: String,
    /// Project whose index was removed
    pub project_id: String,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Context sent with a plain chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    /// All files or the selection
    pub mode: ContextMode,
    /// Selected files; absent in `all` mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<ContextFile>>,
}

/// `POST /api/ai/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User message
    pub message: String,
    /// Context
    pub context: ChatContext,
    /// Chat model; backend default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Response of `POST /api/ai/chat`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Model reply
    #[serde(default)]
    pub reply: Option<String>,
}

/// Retrieval strategy for RAG chat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RagStrategy {
    /// Search the existing index only
    UseExisting,
    /// Index the requested files before searching
    #[default]
    Reindex,
}

/// `POST /api/ai/chat-rag`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagChatRequest {
    /// User message
    pub message: String,
    /// Projects to search
    pub project_ids: Vec<String>,
    /// All files or the selection
    pub mode: ContextMode,
    /// Retrieval strategy
    pub strategy: RagStrategy,
    /// Selected files
    #[serde(default)]
    pub files: Vec<ContextFile>,
    /// Embedding model
    pub embed_model: String,
    /// Chunks to retrieve
    pub top_k: u32,
    /// Chat model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Retrieval report attached to a RAG answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagMetadata {
    /// Strategy the backend applied
    #[serde(default)]
    pub strategy_used: String,
    /// Existing index was used
    #[serde(default)]
    pub used_existing: bool,
    /// Files were indexed for this request
    #[serde(default)]
    pub indexed_now: bool,
    /// Chunks fed to the model
    #[serde(default)]
    pub chunks_used: u32,
    /// Chunks written
    #[serde(default)]
    pub chunks_created: u32,
    /// Files indexed
    #[serde(default)]
    pub files_indexed: u32,
    /// Step log
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_log: Vec<String>,
}

/// Response of `POST /api/ai/chat-rag`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagChatResponse {
    /// Model answer
    #[serde(default)]
    pub answer: Option<String>,
    /// Retrieval report
    #[serde(default)]
    pub rag: Option<RagMetadata>,
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

/// A device file to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Logical path in the device root
    pub path: String,
    /// File name for the multipart part
    pub name: String,
    /// File content
    pub content: Vec<u8>,
}

/// Response of `POST /api/workspace/device/upload`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Files stored
    #[serde(default)]
    pub uploaded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepcode_core::ImportSource;

    #[test]
    fn test_import_response_defaults_indexing_started() {
        let json = r#"{
            "project": {"id": "7b0c", "githubOwner": "acme", "githubRepo": "widgets", "fileCount": 2},
            "tree": [{"id": "1", "name": "README.md", "type": "file", "path": "README.md"}]
        }"#;
        let response: GithubImportResponse = serde_json::from_str(json).unwrap();
        assert!(!response.indexing_started);
        assert_eq!(response.project.file_count, Some(2));
        assert_eq!(response.tree.len(), 1);
    }

    #[test]
    fn test_import_request_omits_empty_options() {
        let meta = GithubMeta::new("acme", "widgets", None, Some("src"));
        let mut request = GithubImportRequest::from_meta(&meta);
        request.index_mode = Some(IndexMode::Lazy);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["subPath"], "src");
        assert_eq!(json["indexMode"], "LAZY");
        assert!(json.get("branch").is_none());
        assert!(json.get("embedModel").is_none());
    }

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            message: "what does main do?".into(),
            context: ChatContext {
                mode: ContextMode::Selected,
                files: Some(vec![ContextFile {
                    source: ImportSource::Github,
                    path: "src/index.ts".into(),
                    github: Some(GithubMeta::new("acme", "widgets", Some("main"), None)),
                }]),
            },
            model: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["context"]["mode"], "selected");
        assert_eq!(json["context"]["files"][0]["github"]["owner"], "acme");
        assert!(json.get("model").is_none());
    }

    #[test]
    fn test_rag_request_wire_shape() {
        let request = RagChatRequest {
            message: "where is auth handled?".into(),
            project_ids: vec!["p1".into()],
            mode: ContextMode::All,
            strategy: RagStrategy::UseExisting,
            files: Vec::new(),
            embed_model: "nomic-embed-text".into(),
            top_k: 5,
            model: Some("llama3.2".into()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["projectIds"][0], "p1");
        assert_eq!(json["strategy"], "use_existing");
        assert_eq!(json["topK"], 5);
    }

    #[test]
    fn test_repo_filter() {
        let repo = GithubRepoInfo {
            name: "widgets".into(),
            full_name: "acme/widgets".into(),
            default_branch: "main".into(),
            is_private: false,
            description: Some("Reusable UI Widgets".into()),
            updated_at: None,
            stargazers_count: 3,
            language: Some("TypeScript".into()),
        };
        assert!(repo.matches(""));
        assert!(repo.matches("acme/"));
        assert!(repo.matches("ui widgets"));
        assert!(!repo.matches("gadgets"));
        assert_eq!(repo.owner(), Some("acme"));
    }

    #[test]
    fn test_embedding_model_detection() {
        let model = |name: &str| ModelInfo {
            name: name.into(),
            size: None,
            modified_at: None,
            status: None,
            active: true,
        };
        assert!(model("nomic-embed-text:latest").is_embedding());
        assert!(model("all-MiniLM").is_embedding());
        assert!(!model("llama3.2").is_embedding());
    }
}
