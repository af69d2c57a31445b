use deepcode_client::ApiError;
use deepcode_core::WorkspaceError;
use thiserror::Error;

/// Errors surfaced by application operations
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected before any request
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// GitHub operation attempted while disconnected
    #[error("Not authenticated. Click \"Connect GitHub\" first.")]
    NotConnected,

    /// Local file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Message for an error banner: the server message for backend errors,
    /// `fallback` when the server gave none
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Api(err) if err.is_auth() => AppError::NotConnected.to_string(),
            AppError::Api(err) => err.user_message(fallback),
            other => other.to_string(),
        }
    }

    /// Whether the GitHub connection must be re-authorized
    pub fn is_auth(&self) -> bool {
        match self {
            AppError::Api(err) => err.is_auth(),
            AppError::NotConnected => true,
            _ => false,
        }
    }
}
