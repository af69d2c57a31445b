//! Client for the deepcode backend
//!
//! The backend owns GitHub access, inference, embedding and authentication.
//! This crate describes each collaborator as an async trait ([`api`]), the
//! JSON bodies exchanged with it ([`types`]) and implements all of them over
//! HTTP with `reqwest` ([`HttpBackend`]).
//!
//! ```rust,ignore
//! use deepcode_client::{GithubApi, HttpBackend};
//!
//! let backend = HttpBackend::new(&config.backend)?;
//! for repo in backend.list_repos(None).await? {
//!     println!("{}", repo.full_name);
//! }
//! ```

pub mod api;
pub mod error;
pub mod http;
pub mod types;

pub use api::{AuthApi, Backend, ChatApi, GithubApi, IndexingApi, ModelsApi, WorkspaceApi};
pub use error::{ApiError, ApiResult};
pub use http::HttpBackend;
pub use types::*;
