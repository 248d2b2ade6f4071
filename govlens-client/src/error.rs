//! Error types for the govlens clients

use govlens_core::FollowError;
use thiserror::Error;

/// Transport-level failure talking to a remote service
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Backend is switched off or unreachable
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a user-preference operation.
#[derive(Debug, Error)]
pub enum UserError {
    /// The backend refused the call; the message is shown as-is
    #[error("{0}")]
    Rejected(String),

    /// Local validation failed before any remote call
    #[error("{0}")]
    InvalidInput(String),

    #[error("Not signed in")]
    NotAuthenticated,

    /// A follow change is already in flight, or none is
    #[error("Follow state error: {0}")]
    Follow(#[from] FollowError),

    #[error(transparent)]
    Transport(#[from] ClientError),
}

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, ClientError>;
