//! Application layer of the deepcode client
//!
//! Wires the core model to the backend:
//!
//! - [`wizard`]: the GitHub import wizard and its indexing sub-states
//! - [`poller`]: cancellable polling of indexing status
//! - [`controller`]: device import and upload, GitHub import and refresh,
//!   previews, manual indexing
//! - [`chat`]: chat transcript and sending

pub mod chat;
pub mod controller;
mod error;
pub mod poller;
pub mod wizard;

pub use chat::ChatSession;
pub use controller::{collect_folder, WorkspaceController};
pub use error::{AppError, AppResult};
pub use poller::{IndexPoller, PollEvent};
pub use wizard::{
    CompletedImport, ImportWizard, IndexingPhase, WizardEvent, WizardState, WizardStep,
};
