//! Scripted in-memory backend for application tests

#![allow(dead_code)]

use async_trait::async_trait;
use deepcode_client::{
    ApiError, ApiResult, AuthApi, AuthState, ChatApi, ChatReply, ChatRequest, GithubApi,
    GithubBranch, GithubFileResponse, GithubImportRequest, GithubImportResponse, GithubRepoInfo,
    GithubStatus, ImportedProject, IndexDeleted, IndexRequest, IndexStarted, IndexingApi,
    ModelInfo, ModelsApi, RagChatRequest, RagChatResponse, UploadFile, UploadResult,
    WorkspaceApi,
};
use deepcode_core::tree::{build_tree, PathEntry};
use deepcode_core::{IndexStatus, IndexStatusResponse};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Every collaborator, answering from scripted results and recording calls
pub struct FakeBackend {
    pub auth: Mutex<ApiResult<AuthState>>,
    pub github_status: Mutex<ApiResult<GithubStatus>>,
    pub repos: Mutex<ApiResult<Vec<GithubRepoInfo>>>,
    pub branches: Mutex<ApiResult<Vec<GithubBranch>>>,
    pub models: Mutex<ApiResult<Vec<ModelInfo>>>,
    pub import: Mutex<ApiResult<GithubImportResponse>>,
    pub statuses: Mutex<VecDeque<ApiResult<IndexStatusResponse>>>,
    pub file: Mutex<ApiResult<GithubFileResponse>>,
    pub chat_reply: Mutex<ApiResult<ChatReply>>,
    pub rag_reply: Mutex<ApiResult<RagChatResponse>>,
    pub upload_result: Mutex<ApiResult<UploadResult>>,

    pub repo_owners: Mutex<Vec<Option<String>>>,
    pub imports: Mutex<Vec<GithubImportRequest>>,
    pub file_requests: Mutex<Vec<(String, String, String, Option<String>)>>,
    pub index_requests: Mutex<Vec<IndexRequest>>,
    pub chats: Mutex<Vec<ChatRequest>>,
    pub rag_chats: Mutex<Vec<RagChatRequest>>,
    pub uploads: Mutex<Vec<Vec<UploadFile>>>,
    pub status_calls: AtomicUsize,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            auth: Mutex::new(Ok(AuthState {
                authenticated: true,
                github_authenticated: true,
                name: Some("Ada".into()),
            })),
            github_status: Mutex::new(Ok(GithubStatus {
                connected: true,
                reason: None,
            })),
            repos: Mutex::new(Ok(vec![repo("widgets", "main"), repo("gadgets", "dev")])),
            branches: Mutex::new(Ok(vec![branch("dev"), branch("main")])),
            models: Mutex::new(Ok(Vec::new())),
            import: Mutex::new(Ok(import_response("p1", &["src/index.ts"], false))),
            statuses: Mutex::new(VecDeque::new()),
            file: Mutex::new(Ok(GithubFileResponse::default())),
            chat_reply: Mutex::new(Ok(ChatReply {
                reply: Some("ok".into()),
            })),
            rag_reply: Mutex::new(Ok(RagChatResponse::default())),
            upload_result: Mutex::new(Ok(UploadResult { uploaded: 0 })),
            repo_owners: Mutex::new(Vec::new()),
            imports: Mutex::new(Vec::new()),
            file_requests: Mutex::new(Vec::new()),
            index_requests: Mutex::new(Vec::new()),
            chats: Mutex::new(Vec::new()),
            rag_chats: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeBackend {
    /// Queue index statuses returned in order
    pub fn script_statuses(&self, statuses: Vec<ApiResult<IndexStatusResponse>>) {
        self.statuses.lock().unwrap().extend(statuses);
    }

    pub fn status_call_count(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

pub fn repo(name: &str, default_branch: &str) -> GithubRepoInfo {
    GithubRepoInfo {
        name: name.into(),
        full_name: format!("acme/{}", name),
        default_branch: default_branch.into(),
        is_private: false,
        description: Some(format!("The {} project", name)),
        updated_at: None,
        stargazers_count: 0,
        language: Some("TypeScript".into()),
    }
}

pub fn branch(name: &str) -> GithubBranch {
    GithubBranch { name: name.into() }
}

pub fn model(name: &str) -> ModelInfo {
    ModelInfo {
        name: name.into(),
        size: None,
        modified_at: None,
        status: None,
        active: true,
    }
}

pub fn import_response(project_id: &str, paths: &[&str], indexing: bool) -> GithubImportResponse {
    GithubImportResponse {
        project: ImportedProject {
            id: project_id.into(),
            github_owner: Some("acme".into()),
            github_repo: Some("widgets".into()),
            file_count: Some(paths.len()),
            ..ImportedProject::default()
        },
        tree: build_tree(paths.iter().map(|p| PathEntry::new(*p, *p))),
        indexing_started: indexing,
    }
}

pub fn status(state: IndexStatus, progress: f64) -> IndexStatusResponse {
    IndexStatusResponse {
        project_id: "p1".into(),
        status: state,
        total_files: 10,
        indexed_files: (progress / 10.0) as u64,
        failed_files: 0,
        total_chunks: 0,
        progress,
        message: format!("{} {}%", state, progress),
        embed_model: Some("nomic-embed-text".into()),
        chunk_size: Some(500),
        chunk_overlap: Some(50),
        error_message: None,
        started_at: None,
        completed_at: None,
    }
}

pub fn auth_error() -> ApiError {
    ApiError::Unauthorized {
        code: Some("GITHUB_AUTH_MISSING".into()),
        message: Some("GitHub authentication required.".into()),
    }
}

pub fn server_error(message: &str) -> ApiError {
    ApiError::Backend {
        status: 500,
        code: None,
        message: Some(message.into()),
    }
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn me(&self) -> ApiResult<AuthState> {
        self.auth.lock().unwrap().clone()
    }

    fn authorization_url(&self) -> String {
        "http://backend.test/oauth2/authorization/github".into()
    }
}

#[async_trait]
impl GithubApi for FakeBackend {
    async fn connection_status(&self) -> ApiResult<GithubStatus> {
        self.github_status.lock().unwrap().clone()
    }

    async fn list_repos(&self, owner: Option<&str>) -> ApiResult<Vec<GithubRepoInfo>> {
        self.repo_owners
            .lock()
            .unwrap()
            .push(owner.map(str::to_string));
        self.repos.lock().unwrap().clone()
    }

    async fn list_branches(&self, _owner: &str, _repo: &str) -> ApiResult<Vec<GithubBranch>> {
        self.branches.lock().unwrap().clone()
    }

    async fn import_repo(&self, request: &GithubImportRequest) -> ApiResult<GithubImportResponse> {
        self.imports.lock().unwrap().push(request.clone());
        self.import.lock().unwrap().clone()
    }

    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> ApiResult<GithubFileResponse> {
        self.file_requests.lock().unwrap().push((
            owner.into(),
            repo.into(),
            path.into(),
            git_ref.map(str::to_string),
        ));
        self.file.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelsApi for FakeBackend {
    async fn list_models(&self) -> ApiResult<Vec<ModelInfo>> {
        self.models.lock().unwrap().clone()
    }
}

#[async_trait]
impl IndexingApi for FakeBackend {
    async fn index_project(&self, request: &IndexRequest) -> ApiResult<IndexStarted> {
        self.index_requests.lock().unwrap().push(request.clone());
        Ok(IndexStarted {
            message: "Indexing started".into(),
            project_id: request.project_id.clone(),
            file_count: Some(request.files.len()),
        })
    }

    async fn index_status(&self, _project_id: &str) -> ApiResult<IndexStatusResponse> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted status".into())))
    }

    async fn delete_index(&self, project_id: &str) -> ApiResult<IndexDeleted> {
        Ok(IndexDeleted {
            message: "Index deleted".into(),
            project_id: project_id.into(),
        })
    }
}

#[async_trait]
impl ChatApi for FakeBackend {
    async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatReply> {
        self.chats.lock().unwrap().push(request.clone());
        self.chat_reply.lock().unwrap().clone()
    }

    async fn chat_rag(&self, request: &RagChatRequest) -> ApiResult<RagChatResponse> {
        self.rag_chats.lock().unwrap().push(request.clone());
        self.rag_reply.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkspaceApi for FakeBackend {
    async fn upload_device_files(&self, files: Vec<UploadFile>) -> ApiResult<UploadResult> {
        let count = files.len();
        self.uploads.lock().unwrap().push(files);
        self.upload_result
            .lock()
            .unwrap()
            .clone()
            .map(|mut r| {
                if r.uploaded == 0 {
                    r.uploaded = count;
                }
                r
            })
    }
}
