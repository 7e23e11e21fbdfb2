//! Error types for invite resolution.

use thiserror::Error;

/// Result type alias for invite operations
pub type InviteResult<T> = Result<T, InviteError>;

#[derive(Debug, Error)]
pub enum InviteError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
}

impl InviteError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}
