//! GitHub import wizard
//!
//! Steps run `auth -> select-repo -> options`. From `options` an import
//! either completes at once (lazy indexing) or moves into indexing, which is
//! tracked with an [`IndexPoller`] until the backend reports a terminal
//! status.
//!
//! The wizard is driven by one owner through `&mut self`; every backend call
//! is awaited in place.

use crate::poller::{IndexPoller, PollEvent};
use deepcode_client::{
    ApiError, Backend, GithubBranch, GithubImportRequest, GithubImportResponse, GithubRepoInfo,
};
use deepcode_config::{ClientConfig, IndexMode};
use deepcode_core::{GithubMeta, IndexStatusResponse};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const PREPARING: &str = "Preparing to index...";

/// Visible wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    /// Check or establish the GitHub connection
    Auth,
    /// Pick a repository
    SelectRepo,
    /// Branch, sub path, indexing options
    Options,
}

/// Indexing sub-state after an import that started indexing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexingPhase {
    /// Polling
    Active,
    /// The job or the polling failed; retry is possible
    Failed,
    /// The job finished
    Completed,
}

/// Where the wizard is, including the import sub-states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// Auth step
    Auth,
    /// Repository step
    SelectRepo,
    /// Options step
    Options,
    /// Import request in flight
    Importing,
    /// Import done, indexing tracked
    Indexing(IndexingPhase),
    /// Import done without indexing
    Completed,
}

/// A finished import: the repository coordinates and the backend response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedImport {
    /// Coordinates the tree belongs to
    pub meta: GithubMeta,
    /// Backend response
    pub response: GithubImportResponse,
}

/// Something that happened while indexing
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    /// New status snapshot
    Progress(IndexStatusResponse),
    /// Indexing finished; the import is complete
    Completed(CompletedImport),
    /// Indexing failed with this message
    Failed(String),
}

/// State machine behind the import dialog
pub struct ImportWizard<B: Backend + ?Sized> {
    backend: Arc<B>,
    poll_interval: Duration,

    step: WizardStep,
    checking_auth: bool,
    connected: bool,
    error: Option<String>,

    owner: String,
    owner_draft: Option<String>,

    loading_repos: bool,
    repos: Vec<GithubRepoInfo>,
    selected_repo: Option<GithubRepoInfo>,
    repo_filter: String,

    loading_branches: bool,
    branches: Vec<GithubBranch>,
    selected_branch: String,
    sub_path: String,
    loading_models: bool,
    embed_models: Vec<String>,
    selected_embed_model: String,
    index_mode: IndexMode,

    importing: bool,
    indexing: Option<IndexingPhase>,
    status: Option<IndexStatusResponse>,
    poller: Option<IndexPoller>,
    pending: Option<CompletedImport>,
    completed: bool,
}

impl<B: Backend + ?Sized> ImportWizard<B> {
    /// New wizard on the auth step
    pub fn new(backend: Arc<B>, config: &ClientConfig) -> Self {
        Self {
            backend,
            poll_interval: config.indexing.poll_interval(),
            step: WizardStep::Auth,
            checking_auth: false,
            connected: false,
            error: None,
            owner: String::new(),
            owner_draft: None,
            loading_repos: false,
            repos: Vec::new(),
            selected_repo: None,
            repo_filter: String::new(),
            loading_branches: false,
            branches: Vec::new(),
            selected_branch: String::new(),
            sub_path: String::new(),
            loading_models: false,
            embed_models: config.indexing.embed_models.clone(),
            selected_embed_model: config.indexing.embed_model.clone(),
            index_mode: config.indexing.index_mode,
            importing: false,
            indexing: None,
            status: None,
            poller: None,
            pending: None,
            completed: false,
        }
    }

    // ------------------------------------------------------------------
    // Auth step
    // ------------------------------------------------------------------

    /// Open the wizard. After an OAuth return the owner draft is restored
    /// and the connection is checked, which advances to repository
    /// selection when GitHub is connected.
    pub async fn open(&mut self, oauth_return: bool) {
        if let Some(owner) = self.owner_draft.take() {
            self.owner = owner;
        }
        if oauth_return {
            self.check_auth().await;
        } else {
            self.checking_auth = false;
            self.connected = false;
        }
    }

    /// Ask the backend whether GitHub is connected
    pub async fn check_auth(&mut self) {
        self.checking_auth = true;
        self.error = None;

        let result = self.backend.me().await;
        self.checking_auth = false;

        match result {
            Ok(state) => {
                self.connected = state.github_authenticated;
                debug!(connected = self.connected, "auth state");
                if self.connected {
                    self.fetch_repos().await;
                }
            }
            Err(err) => {
                self.connected = false;
                self.error = Some(if err.is_auth() {
                    "Authentication required. Please authorize GitHub to continue.".to_string()
                } else {
                    "Failed to check authentication status. Please try again.".to_string()
                });
            }
        }
    }

    /// Remember the owner field and return the OAuth URL to navigate to
    pub fn authorize(&mut self) -> String {
        let owner = self.owner.trim();
        if !owner.is_empty() {
            self.owner_draft = Some(owner.to_string());
        }
        self.backend.authorization_url()
    }

    /// Owner or organization to list; empty means the user's own repositories
    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = owner.into();
    }

    /// Load repositories and advance to the repository step
    pub async fn fetch_repos(&mut self) {
        self.loading_repos = true;
        self.error = None;

        let owner = self.owner.trim();
        let owner = (!owner.is_empty()).then_some(owner);
        let result = self.backend.list_repos(owner).await;
        self.loading_repos = false;

        match result {
            Ok(repos) => {
                info!(count = repos.len(), "repositories loaded");
                self.repos = repos;
                self.step = WizardStep::SelectRepo;
            }
            Err(err) if err.is_auth() => {
                self.connected = false;
                self.error = Some("Authentication required. Please authorize GitHub.".into());
            }
            Err(err) => {
                self.error = Some(err.user_message("Failed to load repositories"));
            }
        }
    }

    // ------------------------------------------------------------------
    // Repository step
    // ------------------------------------------------------------------

    /// Set the repository filter
    pub fn set_repo_filter(&mut self, filter: impl Into<String>) {
        self.repo_filter = filter.into();
    }

    /// Repositories matching the filter
    pub fn filtered_repos(&self) -> Vec<&GithubRepoInfo> {
        let needle = self.repo_filter.trim().to_lowercase();
        self.repos.iter().filter(|r| r.matches(&needle)).collect()
    }

    /// Choose a repository; its default branch becomes the branch
    pub fn select_repo(&mut self, repo: GithubRepoInfo) {
        self.selected_branch = repo.default_branch.clone();
        self.selected_repo = Some(repo);
    }

    /// Advance to options, loading branches and embedding models together
    pub async fn go_to_options(&mut self) {
        let Some(repo) = self.selected_repo.clone() else {
            return;
        };
        self.step = WizardStep::Options;
        self.loading_branches = true;
        self.loading_models = true;

        let (owner, name) = self.repo_coordinates(&repo);
        let backend = Arc::clone(&self.backend);
        let (branches, models) =
            tokio::join!(backend.list_branches(&owner, &name), backend.list_models());

        self.apply_branches(&repo, branches);
        self.apply_models(models);
    }

    fn apply_branches(&mut self, repo: &GithubRepoInfo, result: Result<Vec<GithubBranch>, ApiError>) {
        self.loading_branches = false;
        match result {
            Ok(branches) => {
                if self.selected_branch.is_empty() {
                    let preferred = branches
                        .iter()
                        .find(|b| b.name == repo.default_branch)
                        .or_else(|| branches.first());
                    if let Some(branch) = preferred {
                        self.selected_branch = branch.name.clone();
                    }
                }
                self.branches = branches;
            }
            Err(err) => {
                warn!(repo = %repo.full_name, error = %err, "branch list failed, using default branch");
                self.branches = vec![GithubBranch {
                    name: repo.default_branch.clone(),
                }];
                self.selected_branch = repo.default_branch.clone();
            }
        }
    }

    fn apply_models(&mut self, result: Result<Vec<deepcode_client::ModelInfo>, ApiError>) {
        self.loading_models = false;
        match result {
            Ok(models) => {
                let embed: Vec<String> = models
                    .into_iter()
                    .filter(|m| m.is_embedding())
                    .map(|m| m.name)
                    .collect();
                if let Some(first) = embed.first() {
                    if !embed.contains(&self.selected_embed_model) {
                        self.selected_embed_model = first.clone();
                    }
                    self.embed_models = embed;
                }
            }
            Err(err) => {
                debug!(error = %err, "model list failed, keeping defaults");
            }
        }
    }

    fn repo_coordinates(&self, repo: &GithubRepoInfo) -> (String, String) {
        match repo.full_name.split_once('/') {
            Some((owner, name)) => (owner.to_string(), name.to_string()),
            None => (self.owner.trim().to_string(), repo.name.clone()),
        }
    }

    // ------------------------------------------------------------------
    // Options step
    // ------------------------------------------------------------------

    /// Choose a branch
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.selected_branch = branch.into();
    }

    /// Import only this directory
    pub fn set_sub_path(&mut self, sub_path: impl Into<String>) {
        self.sub_path = sub_path.into();
    }

    /// Choose the embedding model
    pub fn set_embed_model(&mut self, model: impl Into<String>) {
        self.selected_embed_model = model.into();
    }

    /// Pre-index or lazy
    pub fn set_index_mode(&mut self, mode: IndexMode) {
        self.index_mode = mode;
    }

    /// Label of the import button
    pub fn import_button_label(&self) -> &'static str {
        if self.importing {
            "Importing..."
        } else {
            match self.index_mode {
                IndexMode::Preindex => "Import & Index",
                IndexMode::Lazy => "Import",
            }
        }
    }

    /// Whether an import may start now: connected, on the options step,
    /// with nothing in flight
    pub fn can_import(&self) -> bool {
        self.step == WizardStep::Options
            && self.connected
            && self.selected_repo.is_some()
            && !self.loading_branches
            && !self.loading_models
            && !self.importing
            && self.indexing != Some(IndexingPhase::Active)
    }

    /// The request the import button would send
    pub fn import_request(&self) -> Option<GithubImportRequest> {
        let repo = self.selected_repo.as_ref()?;
        let (owner, name) = self.repo_coordinates(repo);
        let branch = if self.selected_branch.trim().is_empty() {
            repo.default_branch.clone()
        } else {
            self.selected_branch.trim().to_string()
        };
        let sub_path = self.sub_path.trim();
        Some(GithubImportRequest {
            owner,
            repo: name,
            branch: (!branch.is_empty()).then_some(branch),
            sub_path: (!sub_path.is_empty()).then(|| sub_path.to_string()),
            index_mode: Some(self.index_mode),
            embed_model: Some(self.selected_embed_model.clone()),
        })
    }

    /// Import the selected repository.
    ///
    /// Returns the completed import when no indexing was started. When
    /// indexing started, the wizard is in [`IndexingPhase::Active`] and
    /// [`ImportWizard::next_event`] reports progress.
    pub async fn import(&mut self) -> Option<CompletedImport> {
        if !self.can_import() {
            debug!("import refused");
            return None;
        }
        let request = self.import_request()?;

        self.importing = true;
        self.error = None;
        self.indexing = None;
        self.completed = false;

        info!(
            owner = %request.owner,
            repo = %request.repo,
            branch = ?request.branch,
            mode = %self.index_mode,
            "starting import"
        );
        let result = self.backend.import_repo(&request).await;
        self.importing = false;

        match result {
            Ok(response) => {
                let done = CompletedImport {
                    meta: request.meta(),
                    response,
                };
                let project_id = done.response.project.id.clone();
                if done.response.indexing_started && !project_id.is_empty() {
                    info!(project_id = %project_id, "indexing started");
                    self.pending = Some(done);
                    self.indexing = Some(IndexingPhase::Active);
                    self.start_polling(project_id);
                    None
                } else {
                    self.completed = true;
                    Some(done)
                }
            }
            Err(err) => {
                if err.is_auth() {
                    self.connected = false;
                }
                self.error = Some(err.user_message("Import failed"));
                None
            }
        }
    }

    fn start_polling(&mut self, project_id: String) {
        self.stop_polling();
        self.poller = Some(IndexPoller::start(
            Arc::clone(&self.backend),
            project_id,
            self.poll_interval,
        ));
    }

    fn stop_polling(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }

    /// Wait for the next indexing event. `None` when nothing is being polled.
    pub async fn next_event(&mut self) -> Option<WizardEvent> {
        let poller = self.poller.as_mut()?;
        let event = poller.next().await;

        match event {
            Some(PollEvent::Status(status)) => Some(self.apply_status(status)),
            Some(PollEvent::Failed(err)) => {
                let message = format!("Failed to track indexing progress: {}", err);
                self.indexing = Some(IndexingPhase::Failed);
                self.error = Some(message.clone());
                self.stop_polling();
                Some(WizardEvent::Failed(message))
            }
            None => {
                self.stop_polling();
                None
            }
        }
    }

    fn apply_status(&mut self, status: IndexStatusResponse) -> WizardEvent {
        self.status = Some(status.clone());

        if status.status.is_success() {
            info!(project_id = %status.project_id, status = %status.status, "indexing completed");
            self.indexing = Some(IndexingPhase::Completed);
            self.stop_polling();
            match self.pending.take() {
                Some(done) => {
                    self.completed = true;
                    WizardEvent::Completed(done)
                }
                None => WizardEvent::Progress(status),
            }
        } else if status.status.is_terminal() {
            let message = status.failure_message().to_string();
            warn!(project_id = %status.project_id, error = %message, "indexing failed");
            self.indexing = Some(IndexingPhase::Failed);
            self.stop_polling();
            WizardEvent::Failed(message)
        } else {
            WizardEvent::Progress(status)
        }
    }

    /// Drive indexing until it completes or fails, reporting each event
    pub async fn wait_for_indexing<F>(&mut self, mut on_event: F) -> Option<CompletedImport>
    where
        F: FnMut(&WizardEvent),
    {
        while let Some(event) = self.next_event().await {
            on_event(&event);
            match event {
                WizardEvent::Completed(done) => return Some(done),
                WizardEvent::Failed(_) => return None,
                WizardEvent::Progress(_) => {}
            }
        }
        None
    }

    /// After a failed indexing run: clear status, error and the pending
    /// import, then import again
    pub async fn retry(&mut self) -> Option<CompletedImport> {
        if self.indexing != Some(IndexingPhase::Failed) {
            return None;
        }
        self.indexing = None;
        self.status = None;
        self.error = None;
        self.pending = None;
        self.import().await
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Whether `step` lies before the current step
    pub fn step_completed(&self, step: WizardStep) -> bool {
        step < self.step
    }

    /// Jump to a step, clearing the error
    pub fn go_to_step(&mut self, step: WizardStep) {
        self.error = None;
        self.step = step;
    }

    /// Close the wizard. Refused while indexing is active.
    pub fn close(&mut self) -> bool {
        if self.indexing == Some(IndexingPhase::Active) {
            return false;
        }
        self.stop_polling();
        true
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Current state including import sub-states
    pub fn state(&self) -> WizardState {
        if self.importing {
            WizardState::Importing
        } else if let Some(phase) = self.indexing {
            WizardState::Indexing(phase)
        } else if self.completed {
            WizardState::Completed
        } else {
            match self.step {
                WizardStep::Auth => WizardState::Auth,
                WizardStep::SelectRepo => WizardState::SelectRepo,
                WizardStep::Options => WizardState::Options,
            }
        }
    }

    /// Current step
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Whether GitHub is connected
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Auth check in flight
    pub fn is_checking_auth(&self) -> bool {
        self.checking_auth
    }

    /// Step-scoped error banner
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Owner field
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository list in flight
    pub fn is_loading_repos(&self) -> bool {
        self.loading_repos
    }

    /// All loaded repositories
    pub fn repos(&self) -> &[GithubRepoInfo] {
        &self.repos
    }

    /// Selected repository
    pub fn selected_repo(&self) -> Option<&GithubRepoInfo> {
        self.selected_repo.as_ref()
    }

    /// Branch list in flight
    pub fn is_loading_branches(&self) -> bool {
        self.loading_branches
    }

    /// Loaded branches
    pub fn branches(&self) -> &[GithubBranch] {
        &self.branches
    }

    /// Selected branch
    pub fn selected_branch(&self) -> &str {
        &self.selected_branch
    }

    /// Model list in flight
    pub fn is_loading_models(&self) -> bool {
        self.loading_models
    }

    /// Embedding model choices
    pub fn embed_models(&self) -> &[String] {
        &self.embed_models
    }

    /// Selected embedding model
    pub fn selected_embed_model(&self) -> &str {
        &self.selected_embed_model
    }

    /// Index timing
    pub fn index_mode(&self) -> IndexMode {
        self.index_mode
    }

    /// Import request in flight
    pub fn is_importing(&self) -> bool {
        self.importing
    }

    /// Indexing sub-state, if an import started indexing
    pub fn indexing_phase(&self) -> Option<IndexingPhase> {
        self.indexing
    }

    /// Latest indexing status
    pub fn indexing_status(&self) -> Option<&IndexStatusResponse> {
        self.status.as_ref()
    }

    /// Progress percentage, 0 before the first status
    pub fn progress(&self) -> u8 {
        self.status.as_ref().map_or(0, IndexStatusResponse::percent)
    }

    /// Progress message
    pub fn progress_message(&self) -> &str {
        self.status.as_ref().map_or(PREPARING, |s| s.message.as_str())
    }

    /// Failure detail after a failed indexing run
    pub fn failure_message(&self) -> Option<&str> {
        if self.indexing != Some(IndexingPhase::Failed) {
            return None;
        }
        self.error
            .as_deref()
            .or_else(|| self.status.as_ref().map(IndexStatusResponse::failure_message))
    }

    /// Whether the poll task is alive
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(IndexPoller::is_running)
    }
}
