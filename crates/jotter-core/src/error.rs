//! Error types for jotter-core

use thiserror::Error;

/// Result type alias using jotter-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the notes API or managing the session
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or rejected credentials, or no stored token to use
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The register call itself failed
    #[error("Registration failed: {0}")]
    Registration(String),

    /// Non-success status on a data call
    #[error("Request failed: {message}")]
    Fetch { status: u16, message: String },

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Token storage backend error
    #[error("Token storage error: {0}")]
    Storage(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status of a failed data call, if this error came from one.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}
