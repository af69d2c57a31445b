//! Collaborator traits
//!
//! One trait per backend area. Application code is generic over
//! [`Backend`], so tests can swap in an in-memory fake.

use crate::error::ApiResult;
use crate::types::{
    AuthState, ChatReply, ChatRequest, GithubBranch, GithubFileResponse, GithubImportRequest,
    GithubImportResponse, GithubRepoInfo, GithubStatus, IndexDeleted, IndexRequest, IndexStarted,
    ModelInfo, RagChatRequest, RagChatResponse, UploadFile, UploadResult,
};
use async_trait::async_trait;
use deepcode_core::IndexStatusResponse;

/// Session and OAuth
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Current session state
    async fn me(&self) -> ApiResult<AuthState>;

    /// URL that starts the GitHub OAuth flow. The caller navigates to it.
    fn authorization_url(&self) -> String;
}

/// GitHub access through the backend
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Whether a GitHub token is available
    async fn connection_status(&self) -> ApiResult<GithubStatus>;

    /// Repositories of `owner`, or of the authenticated user
    async fn list_repos(&self, owner: Option<&str>) -> ApiResult<Vec<GithubRepoInfo>>;

    /// Branches of a repository
    async fn list_branches(&self, owner: &str, repo: &str) -> ApiResult<Vec<GithubBranch>>;

    /// Import a repository and optionally start indexing
    async fn import_repo(&self, request: &GithubImportRequest) -> ApiResult<GithubImportResponse>;

    /// Fetch one file. `git_ref` selects the branch.
    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> ApiResult<GithubFileResponse>;
}

/// Installed models
#[async_trait]
pub trait ModelsApi: Send + Sync {
    /// All installed models
    async fn list_models(&self) -> ApiResult<Vec<ModelInfo>>;
}

/// Embedding jobs
#[async_trait]
pub trait IndexingApi: Send + Sync {
    /// Start indexing a project
    async fn index_project(&self, request: &IndexRequest) -> ApiResult<IndexStarted>;

    /// Current job status
    async fn index_status(&self, project_id: &str) -> ApiResult<IndexStatusResponse>;

    /// Drop a project's index
    async fn delete_index(&self, project_id: &str) -> ApiResult<IndexDeleted>;
}

/// Model conversations
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Plain chat with explicit context
    async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatReply>;

    /// Retrieval-augmented chat over indexed projects
    async fn chat_rag(&self, request: &RagChatRequest) -> ApiResult<RagChatResponse>;
}

/// Device file storage
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    /// Upload device files so the backend can use them as context
    async fn upload_device_files(&self, files: Vec<UploadFile>) -> ApiResult<UploadResult>;
}

/// Every collaborator at once
pub trait Backend:
    AuthApi + GithubApi + ModelsApi + IndexingApi + ChatApi + WorkspaceApi + 'static
{
}

impl<T> Backend for T where
    T: AuthApi + GithubApi + ModelsApi + IndexingApi + ChatApi + WorkspaceApi + 'static
{
}
