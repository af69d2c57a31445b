//! Workspace operations that talk to the backend
//!
//! [`WorkspaceController`] owns the [`Workspace`] and performs the side
//! effects around it: reading and uploading device files, importing and
//! refreshing repositories, fetching previews and starting indexing.

use crate::error::{AppError, AppResult};
use crate::poller::IndexPoller;
use crate::wizard::CompletedImport;
use deepcode_client::{
    Backend, GithubImportRequest, IndexDeleted, IndexRequest, IndexStarted, UploadFile,
};
use deepcode_config::ClientConfig;
use deepcode_core::preview::{decode_base64_content, preview_from_bytes};
use deepcode_core::workspace::{github_target, PreviewSource};
use deepcode_core::{ContextMode, DeviceFile, NodeId, Preview, Workspace};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Collect every file below `folder`. Logical paths start with the folder's
/// own name, the way a browser folder picker reports them.
pub fn collect_folder(folder: &Path) -> AppResult<Vec<DeviceFile>> {
    let base = folder.parent().unwrap_or(folder);
    let mut files = Vec::new();

    for entry in WalkDir::new(folder).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| AppError::Io {
            path: folder.display().to_string(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(base).unwrap_or(entry.path());
        let relative = relative.to_string_lossy().replace('\\', "/");
        files.push(DeviceFile::in_folder(&relative, entry.path()));
    }

    debug!(folder = %folder.display(), files = files.len(), "folder scanned");
    Ok(files)
}

/// The workspace plus the backend it syncs with
pub struct WorkspaceController<B: Backend + ?Sized> {
    backend: Arc<B>,
    config: ClientConfig,
    workspace: Workspace,
    connected: bool,
}

impl<B: Backend + ?Sized> WorkspaceController<B> {
    /// Empty workspace
    pub fn new(backend: Arc<B>, config: ClientConfig) -> Self {
        Self {
            backend,
            config,
            workspace: Workspace::new(),
            connected: false,
        }
    }

    /// The workspace
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// The workspace, for selection and focus changes
    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    /// Backend handle
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Whether GitHub is believed to be connected
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Override the connected flag, e.g. after the wizard checked it
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Ask the backend whether GitHub is connected
    pub async fn check_connection(&mut self) -> AppResult<bool> {
        let status = self.backend.connection_status().await?;
        self.connected = status.connected;
        if let Some(reason) = status.reason.as_deref() {
            debug!(reason, "GitHub not connected");
        }
        Ok(self.connected)
    }

    // ------------------------------------------------------------------
    // Device files
    // ------------------------------------------------------------------

    /// Add device files to the device root and upload the text ones.
    ///
    /// Upload failures are logged and otherwise ignored. Returns the number
    /// of files the backend stored.
    pub async fn import_device_files(&mut self, files: Vec<DeviceFile>) -> usize {
        if files.is_empty() {
            return 0;
        }
        let uploadable: Vec<DeviceFile> = files
            .iter()
            .filter(|f| f.is_uploadable())
            .cloned()
            .collect();
        self.workspace.import_device(files);
        self.upload(uploadable).await
    }

    /// Import every file below `folder`
    pub async fn import_device_folder(&mut self, folder: &Path) -> AppResult<usize> {
        let files = collect_folder(folder)?;
        Ok(self.import_device_files(files).await)
    }

    async fn upload(&self, files: Vec<DeviceFile>) -> usize {
        if files.is_empty() {
            return 0;
        }

        let mut uploads = Vec::with_capacity(files.len());
        for file in files {
            match tokio::fs::read(&file.location).await {
                Ok(content) => uploads.push(UploadFile {
                    path: file.path,
                    name: file.name,
                    content,
                }),
                Err(e) => warn!(path = %file.location.display(), error = %e, "skipping unreadable file"),
            }
        }
        if uploads.is_empty() {
            return 0;
        }

        match self.backend.upload_device_files(uploads).await {
            Ok(result) => {
                info!(uploaded = result.uploaded, "device files uploaded");
                result.uploaded
            }
            Err(err) => {
                warn!(error = %err, "device file upload failed");
                0
            }
        }
    }

    // ------------------------------------------------------------------
    // GitHub
    // ------------------------------------------------------------------

    /// Import a repository without the wizard and attach it as a root
    pub async fn quick_import(
        &mut self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
        sub_path: Option<&str>,
    ) -> AppResult<NodeId> {
        if !self.connected {
            return Err(AppError::NotConnected);
        }
        let meta = github_target(owner, repo, branch, sub_path)?;
        let request = GithubImportRequest::from_meta(&meta);

        match self.backend.import_repo(&request).await {
            Ok(response) => Ok(self.attach_import(CompletedImport { meta, response })),
            Err(err) => {
                if err.is_auth() {
                    self.connected = false;
                }
                Err(err.into())
            }
        }
    }

    /// Attach a finished import as a GitHub root and record its project
    pub fn attach_import(&mut self, import: CompletedImport) -> NodeId {
        let CompletedImport { meta, response } = import;
        let project = Some(response.project.id.clone())
            .filter(|id| !id.is_empty())
            .map(|id| (id, response.project.file_count));
        self.workspace.attach_github_tree(meta, response.tree, project)
    }

    /// Re-import a GitHub root and replace its children
    pub async fn refresh(&mut self, root_id: &NodeId) -> AppResult<()> {
        let meta = self.workspace.github_root_meta(root_id)?;
        let request = GithubImportRequest::from_meta(&meta);
        let response = match self.backend.import_repo(&request).await {
            Ok(response) => response,
            Err(err) => {
                if err.is_auth() {
                    self.connected = false;
                }
                warn!(repo = %meta.full_name(), error = %err, "refresh failed");
                return Err(err.into());
            }
        };
        self.workspace.refresh_github_root(root_id, response.tree)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Preview
    // ------------------------------------------------------------------

    /// Load a file node for display. Failures become an unknown preview
    /// carrying the message.
    pub async fn preview(&mut self, id: &NodeId) -> Preview {
        let Some(node) = self.workspace.node(id) else {
            return Preview::unknown(id.as_str(), "This file is no longer in the workspace.");
        };
        let path = node.path.clone();
        if node.is_folder() {
            return Preview::unknown(path, "Select a file to preview.");
        }

        let source = match self.workspace.preview_source(id) {
            Ok(source) => source,
            Err(err) => return Preview::unknown(path, err.to_string()),
        };

        match source {
            PreviewSource::Local(location) => match tokio::fs::read(&location).await {
                Ok(bytes) => preview_from_bytes(&path, bytes),
                Err(e) => {
                    warn!(path = %location.display(), error = %e, "local preview failed");
                    Preview::unknown(path, "Failed to read local file.")
                }
            },
            PreviewSource::Github { meta, path: repo_path } => {
                let result = self
                    .backend
                    .get_file(&meta.owner, &meta.repo, &repo_path, meta.branch.as_deref())
                    .await;
                match result {
                    Ok(file) => {
                        match decode_base64_content(file.content.as_deref(), file.encoding.as_deref())
                        {
                            Ok(bytes) => preview_from_bytes(&path, bytes),
                            Err(err) => Preview::unknown(path, err.to_string()),
                        }
                    }
                    Err(err) if err.is_auth() => {
                        self.connected = false;
                        Preview::unknown(
                            path,
                            "Not authenticated. Please click \"Connect GitHub\" then try again.",
                        )
                    }
                    Err(err) => {
                        Preview::unknown(path, err.user_message("Failed to fetch file from GitHub."))
                    }
                }
            }
            PreviewSource::Unavailable => Preview::unknown(
                path,
                "No file content source available (not a local file and no GitHub metadata).",
            ),
        }
    }

    // ------------------------------------------------------------------
    // Indexing
    // ------------------------------------------------------------------

    /// Index the selected files of a project with the configured model and
    /// chunking
    pub async fn start_index(&self, project_id: &str) -> AppResult<IndexStarted> {
        let files = self.workspace.require_selection()?;
        let indexing = &self.config.indexing;
        let request = IndexRequest {
            project_id: project_id.to_string(),
            mode: ContextMode::Selected,
            files,
            embed_model: indexing.embed_model.clone(),
            chunk_size: indexing.chunk_size,
            chunk_overlap: indexing.chunk_overlap,
        };
        info!(project_id, files = request.files.len(), "manual indexing requested");
        Ok(self.backend.index_project(&request).await?)
    }

    /// Poll a project's indexing status at the configured interval
    pub fn poll_index(&self, project_id: &str) -> IndexPoller {
        IndexPoller::start(
            Arc::clone(&self.backend),
            project_id,
            self.config.indexing.poll_interval(),
        )
    }

    /// Drop a project's index
    pub async fn delete_index(&self, project_id: &str) -> AppResult<IndexDeleted> {
        Ok(self.backend.delete_index(project_id).await?)
    }
}
