//! The workspace aggregate
//!
//! [`Workspace`] owns the root forest, the device registry and the project
//! store. All mutation goes through `&mut self`, and every tree change is
//! computed as a new value and then committed.

use crate::context::{selected_context_files, ContextFile};
use crate::project::{ProjectStore, ProjectSummary};
use crate::registry::{DeviceFile, DeviceRegistry};
use crate::tree::{
    self, build_tree, count_files, find_node, merge_nodes, remove_node, FileNode, GithubMeta,
    ImportSource, NodeId,
};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Fixed id of the device root
pub const DEVICE_ROOT_ID: &str = "device_root";
/// Project id used for device batches
pub const DEVICE_PROJECT_ID: &str = "device";

/// Validation failures caught before any request is made
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    /// Owner or repository left empty
    #[error("Owner and repo are required.")]
    MissingRepository,

    /// Selected-context operation with nothing selected
    #[error("No files selected. Tick at least one file first.")]
    NoFilesSelected,

    /// Operation needs a GitHub root
    #[error("node {0} is not a GitHub root")]
    NotAGithubRoot(NodeId),

    /// No node with this id
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
}

/// Result type for workspace operations
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Validate user input for a GitHub import
pub fn github_target(
    owner: &str,
    repo: &str,
    branch: Option<&str>,
    sub_path: Option<&str>,
) -> WorkspaceResult<GithubMeta> {
    let meta = GithubMeta::new(owner, repo, branch, sub_path);
    if meta.owner.is_empty() || meta.repo.is_empty() {
        return Err(WorkspaceError::MissingRepository);
    }
    Ok(meta)
}

/// Where the content of a file node can be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewSource {
    /// A registered device file
    Local(PathBuf),
    /// A file inside an imported repository
    Github {
        /// Repository of the containing root
        meta: GithubMeta,
        /// Path inside the repository, `subPath` included
        path: String,
    },
    /// Neither
    Unavailable,
}

/// Roots plus registries
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    roots: Vec<FileNode>,
    devices: DeviceRegistry,
    projects: ProjectStore,
    focused: Option<NodeId>,
    root_projects: HashMap<NodeId, String>,
}

impl Workspace {
    /// Empty workspace. The device root appears on the first device import.
    pub fn new() -> Self {
        Self::default()
    }

    /// Root nodes; the device root, when present, comes first
    pub fn roots(&self) -> &[FileNode] {
        &self.roots
    }

    /// Device file registry
    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    /// Project registry
    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    /// Look up any node
    pub fn node(&self, id: &NodeId) -> Option<&FileNode> {
        find_node(&self.roots, id)
    }

    /// Project id bound to a root, if any
    pub fn project_for_root(&self, root_id: &NodeId) -> Option<&str> {
        self.root_projects.get(root_id).map(String::as_str)
    }

    /// Register device files and merge them into the device root.
    ///
    /// Returns the id of the device root.
    pub fn import_device(&mut self, files: Vec<DeviceFile>) -> NodeId {
        let root_id = NodeId::from(DEVICE_ROOT_ID);
        if files.is_empty() {
            return root_id;
        }

        let incoming = build_tree(files.iter().map(DeviceFile::entry));
        for file in files {
            self.devices.insert(file);
        }

        let position = self.roots.iter().position(|r| r.id == root_id);
        let position = match position {
            Some(position) => position,
            None => {
                self.roots.insert(0, device_root());
                0
            }
        };

        let root = &mut self.roots[position];
        root.expanded = true;
        root.children = merge_nodes(&root.children, &incoming);

        let file_count = count_files(&root.children);
        let snapshot = root.children.clone();
        info!(files = file_count, "device files imported");

        self.projects
            .add_or_update(ProjectSummary::device(DEVICE_PROJECT_ID, file_count), snapshot);
        self.root_projects
            .insert(root_id.clone(), DEVICE_PROJECT_ID.to_string());
        root_id
    }

    /// Attach an imported repository tree.
    ///
    /// A root with the same `(owner, repo, branch, subPath)` already present
    /// absorbs the tree by merging; otherwise a new root is appended. When a
    /// backend project id is known the project registry is updated.
    pub fn attach_github_tree(
        &mut self,
        meta: GithubMeta,
        tree: Vec<FileNode>,
        project: Option<(String, Option<usize>)>,
    ) -> NodeId {
        let existing = self.roots.iter().position(|r| {
            r.source == Some(ImportSource::Github) && r.github_meta.as_ref() == Some(&meta)
        });

        let index = match existing {
            Some(index) => {
                let root = &mut self.roots[index];
                root.expanded = true;
                root.children = merge_nodes(&root.children, &tree);
                debug!(repo = %meta.full_name(), "merged into existing GitHub root");
                index
            }
            None => {
                self.roots.push(github_root(&meta, tree));
                self.roots.len() - 1
            }
        };

        let root = &self.roots[index];
        let root_id = root.id.clone();
        info!(
            repo = %meta.full_name(),
            root = %root_id,
            files = count_files(&root.children),
            "GitHub tree attached"
        );

        if let Some((project_id, file_count)) = project {
            let count = file_count.unwrap_or_else(|| count_files(&root.children));
            let snapshot = root.children.clone();
            self.projects
                .add_or_update(ProjectSummary::github(&project_id, &meta, count), snapshot);
            if let Some(previous) = self.root_projects.insert(root_id.clone(), project_id.clone()) {
                if previous != project_id {
                    debug!(previous = %previous, project_id = %project_id, "root moved to new project");
                    self.projects.remove(&previous);
                }
            }
        }
        root_id
    }

    /// Metadata of a GitHub root
    pub fn github_root_meta(&self, root_id: &NodeId) -> WorkspaceResult<GithubMeta> {
        let root = self
            .roots
            .iter()
            .find(|r| &r.id == root_id)
            .ok_or_else(|| WorkspaceError::UnknownNode(root_id.clone()))?;
        match (&root.source, &root.github_meta) {
            (Some(ImportSource::Github), Some(meta)) => Ok(meta.clone()),
            _ => Err(WorkspaceError::NotAGithubRoot(root_id.clone())),
        }
    }

    /// Replace the children of a GitHub root with a freshly imported tree
    pub fn refresh_github_root(
        &mut self,
        root_id: &NodeId,
        tree: Vec<FileNode>,
    ) -> WorkspaceResult<()> {
        let meta = self.github_root_meta(root_id)?;
        let Some(root) = self.roots.iter_mut().find(|r| &r.id == root_id) else {
            return Err(WorkspaceError::UnknownNode(root_id.clone()));
        };
        root.expanded = true;
        root.children = tree;

        let file_count = count_files(&root.children);
        let snapshot = root.children.clone();
        info!(repo = %meta.full_name(), files = file_count, "GitHub root refreshed");

        if let Some(project_id) = self.root_projects.get(root_id) {
            self.projects.add_or_update(
                ProjectSummary::github(project_id, &meta, file_count),
                snapshot,
            );
        }
        Ok(())
    }

    /// Metadata of the GitHub root that contains `id`
    pub fn github_meta_for(&self, id: &NodeId) -> Option<&GithubMeta> {
        self.roots
            .iter()
            .filter(|r| r.is_folder() && r.source == Some(ImportSource::Github))
            .find(|r| tree::contains_node(r, id))
            .and_then(|r| r.github_meta.as_ref())
    }

    /// Where to read the content of file `id` from
    pub fn preview_source(&self, id: &NodeId) -> WorkspaceResult<PreviewSource> {
        let node = self
            .node(id)
            .ok_or_else(|| WorkspaceError::UnknownNode(id.clone()))?;
        if let Some(local) = self.devices.get(&node.path) {
            return Ok(PreviewSource::Local(local.location.clone()));
        }
        Ok(match self.github_meta_for(id) {
            Some(meta) => PreviewSource::Github {
                meta: meta.clone(),
                path: meta.repository_path(&node.path),
            },
            None => PreviewSource::Unavailable,
        })
    }

    /// Flip the selection of a file node
    pub fn toggle_selection(&mut self, id: &NodeId) -> WorkspaceResult<()> {
        if self.node(id).is_none() {
            return Err(WorkspaceError::UnknownNode(id.clone()));
        }
        self.roots = tree::toggle_selection(&self.roots, id);
        Ok(())
    }

    /// Select every file whose path is listed
    pub fn select_paths(&mut self, paths: &[&str]) {
        self.roots = tree::select_paths(&self.roots, paths);
    }

    /// Focus a node for deletion or preview
    pub fn focus(&mut self, id: &NodeId) -> WorkspaceResult<()> {
        if self.node(id).is_none() {
            return Err(WorkspaceError::UnknownNode(id.clone()));
        }
        self.focused = Some(id.clone());
        Ok(())
    }

    /// Currently focused node
    pub fn focused(&self) -> Option<&FileNode> {
        self.focused.as_ref().and_then(|id| self.node(id))
    }

    /// Delete the focused node and clear focus.
    ///
    /// A deleted file leaves the device registry; a deleted root takes its
    /// project with it.
    pub fn delete_focused(&mut self) -> Option<FileNode> {
        let id = self.focused.take()?;
        let node = self.node(&id)?.clone();
        let was_root = self.roots.iter().any(|r| r.id == id);

        self.roots = remove_node(&self.roots, &id);
        if node.is_file() {
            self.devices.remove(&node.path);
        }
        if was_root {
            if let Some(project_id) = self.root_projects.remove(&id) {
                self.projects.remove(&project_id);
            }
        }
        info!(node = %id, path = %node.path, "node deleted");
        Some(node)
    }

    /// Selected files with provenance
    pub fn selected_context_files(&self) -> Vec<ContextFile> {
        selected_context_files(&self.roots, &self.devices)
    }

    /// Selected files, failing when there are none
    pub fn require_selection(&self) -> WorkspaceResult<Vec<ContextFile>> {
        let files = self.selected_context_files();
        if files.is_empty() {
            return Err(WorkspaceError::NoFilesSelected);
        }
        Ok(files)
    }
}

fn device_root() -> FileNode {
    let mut root = FileNode::folder("From device", "from-device");
    root.id = NodeId::from(DEVICE_ROOT_ID);
    root.expanded = true;
    root.source = Some(ImportSource::Device);
    root
}

fn github_root(meta: &GithubMeta, children: Vec<FileNode>) -> FileNode {
    let mut root = FileNode::folder(
        format!("From GitHub ({})", meta.repo),
        format!("from-github/{}/{}", meta.owner, meta.repo),
    );
    root.id = NodeId::generate("ghroot");
    root.expanded = true;
    root.source = Some(ImportSource::Github);
    root.github_meta = Some(meta.clone());
    root.children = children;
    root
}
