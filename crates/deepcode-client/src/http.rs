//! reqwest implementation of every collaborator trait

use crate::api::{AuthApi, ChatApi, GithubApi, IndexingApi, ModelsApi, WorkspaceApi};
use crate::error::{ApiError, ApiResult};
use crate::types::{
    AuthState, ChatReply, ChatRequest, GithubBranch, GithubFileResponse, GithubImportRequest,
    GithubImportResponse, GithubRepoInfo, GithubStatus, IndexDeleted, IndexRequest, IndexStarted,
    ModelInfo, RagChatRequest, RagChatResponse, UploadFile, UploadResult,
};
use async_trait::async_trait;
use deepcode_config::BackendConfig;
use deepcode_core::IndexStatusResponse;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// HTTP client for the deepcode backend.
///
/// Session cookies set by the backend are kept for the lifetime of the
/// client, so an OAuth session survives across calls.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client from configuration
    pub fn new(config: &BackendConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, config.base_url()))
    }

    /// Use an existing reqwest client
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `path` plus one percent-encoded segment, so an id never changes the route
    fn url_with_segment(&self, path: &str, segment: &str) -> ApiResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.url(path))
            .map_err(|e| ApiError::Transport(format!("invalid backend URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Transport(format!("invalid backend URL: {}", self.base_url)))?
            .push(segment);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "backend request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &body);
            debug!(path = %url, status = status.as_u16(), error = %err, "backend error");
            return Err(err);
        }

        debug!(path = %url, status = status.as_u16(), bytes = body.len(), "backend response");
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl AuthApi for HttpBackend {
    async fn me(&self) -> ApiResult<AuthState> {
        self.send(self.client.get(self.url("/auth/me"))).await
    }

    fn authorization_url(&self) -> String {
        self.url("/oauth2/authorization/github")
    }
}

#[async_trait]
impl GithubApi for HttpBackend {
    async fn connection_status(&self) -> ApiResult<GithubStatus> {
        self.send(self.client.get(self.url("/api/github/status")))
            .await
    }

    async fn list_repos(&self, owner: Option<&str>) -> ApiResult<Vec<GithubRepoInfo>> {
        let mut request = self.client.get(self.url("/api/github/repos"));
        if let Some(owner) = owner.map(str::trim).filter(|o| !o.is_empty()) {
            request = request.query(&[("owner", owner)]);
        }
        self.send(request).await
    }

    async fn list_branches(&self, owner: &str, repo: &str) -> ApiResult<Vec<GithubBranch>> {
        let request = self
            .client
            .get(self.url("/api/github/branches"))
            .query(&[("owner", owner), ("repo", repo)]);
        self.send(request).await
    }

    async fn import_repo(&self, request: &GithubImportRequest) -> ApiResult<GithubImportResponse> {
        debug!(
            owner = %request.owner,
            repo = %request.repo,
            branch = ?request.branch,
            index_mode = ?request.index_mode,
            "importing repository"
        );
        self.send(self.client.post(self.url("/api/github/import")).json(request))
            .await
    }

    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> ApiResult<GithubFileResponse> {
        let mut query = vec![("owner", owner), ("repo", repo), ("path", path)];
        if let Some(git_ref) = git_ref {
            query.push(("ref", git_ref));
        }
        let request = self
            .client
            .get(self.url("/api/github/file"))
            .query(&query);
        self.send(request).await
    }
}

#[async_trait]
impl ModelsApi for HttpBackend {
    async fn list_models(&self) -> ApiResult<Vec<ModelInfo>> {
        self.send(self.client.get(self.url("/api/admin/models")))
            .await
    }
}

#[async_trait]
impl IndexingApi for HttpBackend {
    async fn index_project(&self, request: &IndexRequest) -> ApiResult<IndexStarted> {
        debug!(
            project_id = %request.project_id,
            mode = %request.mode,
            files = request.files.len(),
            "starting indexing"
        );
        self.send(self.client.post(self.url("/api/index/project")).json(request))
            .await
    }

    async fn index_status(&self, project_id: &str) -> ApiResult<IndexStatusResponse> {
        let url = self.url_with_segment("/api/index/status", project_id)?;
        self.send(self.client.get(url)).await
    }

    async fn delete_index(&self, project_id: &str) -> ApiResult<IndexDeleted> {
        let url = self.url_with_segment("/api/index/project", project_id)?;
        self.send(self.client.delete(url)).await
    }
}

#[async_trait]
impl ChatApi for HttpBackend {
    async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatReply> {
        debug!(
            mode = %request.context.mode,
            files = request.context.files.as_ref().map_or(0, Vec::len),
            "sending chat message"
        );
        self.send(self.client.post(self.url("/api/ai/chat")).json(request))
            .await
    }

    async fn chat_rag(&self, request: &RagChatRequest) -> ApiResult<RagChatResponse> {
        debug!(
            projects = request.project_ids.len(),
            top_k = request.top_k,
            "sending RAG chat message"
        );
        self.send(self.client.post(self.url("/api/ai/chat-rag")).json(request))
            .await
    }
}

#[async_trait]
impl WorkspaceApi for HttpBackend {
    async fn upload_device_files(&self, files: Vec<UploadFile>) -> ApiResult<UploadResult> {
        let count = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.content).file_name(file.name);
            form = form.part("files", part).text("paths", file.path);
        }
        debug!(files = count, "uploading device files");
        self.send(
            self.client
                .post(self.url("/api/workspace/device/upload"))
                .multipart(form),
        )
        .await
    }
}
