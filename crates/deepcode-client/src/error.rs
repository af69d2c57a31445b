//! Backend error taxonomy

use serde::Deserialize;
use thiserror::Error;

/// Backend codes that mean the GitHub connection must be re-authorized
pub const AUTH_CODES: &[&str] = &["GITHUB_AUTH_MISSING", "GITHUB_TOKEN_MISSING"];

/// Errors from backend calls
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 401, or a GitHub auth code
    #[error("not authenticated: {}", .message.as_deref().unwrap_or("please connect GitHub"))]
    Unauthorized {
        /// Backend error code
        code: Option<String>,
        /// Server message
        message: Option<String>,
    },

    /// Any other non-success status
    #[error("backend returned {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Backend {
        /// HTTP status
        status: u16,
        /// Backend error code
        code: Option<String>,
        /// Server message
        message: Option<String>,
    },

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body did not decode
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for backend calls
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiError {
    /// Classify a non-success response from its status and body.
    ///
    /// The message is taken from `message`, then `error`. Bodies that are
    /// not JSON carry no message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty());
        let code = parsed.code;

        let auth_code = code.as_deref().is_some_and(|c| AUTH_CODES.contains(&c));
        if status == 401 || auth_code {
            ApiError::Unauthorized { code, message }
        } else {
            ApiError::Backend {
                status,
                code,
                message,
            }
        }
    }

    /// Whether the caller should reset its connected state and re-authorize
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// HTTP status, when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend error code
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { code, .. } | ApiError::Backend { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Server supplied message, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message, .. } | ApiError::Backend { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// The server message, or `fallback` when the server gave none
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(err.to_string())
    }
}
