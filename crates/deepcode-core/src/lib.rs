//! Core model for the deepcode client
//!
//! Everything in this crate is synchronous and free of I/O. The workspace is
//! a forest of [`FileNode`] roots (one device root plus one root per imported
//! GitHub repository); every tree operation takes the current nodes by
//! reference and returns a new tree value.
//!
//! - [`tree`]: build, merge, remove and select nodes
//! - [`context`]: derive the selected files, with provenance, for chat and indexing
//! - [`registry`]: local device files keyed by logical path
//! - [`project`]: bookkeeping of imported projects
//! - [`workspace`]: the aggregate that owns the roots and both registries
//! - [`status`]: mirrored indexing job status
//! - [`chat`]: chat transcript
//! - [`preview`]: decoding fetched file content for display

pub mod chat;
pub mod context;
pub mod preview;
pub mod project;
pub mod registry;
pub mod status;
pub mod tree;
pub mod workspace;

pub use chat::{ChatMessage, ChatRole, Transcript};
pub use context::{selected_context_files, ContextFile};
pub use deepcode_config::{ContextMode, IndexMode};
pub use preview::{Preview, PreviewError, PreviewKind};
pub use project::{ProjectData, ProjectStore, ProjectSummary};
pub use registry::{DeviceFile, DeviceRegistry};
pub use status::{IndexStatus, IndexStatusResponse};
pub use tree::{FileNode, GithubMeta, ImportSource, NodeId, NodeKind, PathEntry};
pub use workspace::{Workspace, WorkspaceError, WorkspaceResult};
