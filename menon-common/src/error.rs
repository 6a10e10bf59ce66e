//! Common error types for Menon

use thiserror::Error;

/// Common result type for Menon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Menon crates
#[derive(Error, Debug)]
pub enum Error {
    /// Remote store rejected the request (status code and response body)
    #[error("Store error {status}: {message}")]
    Store { status: u16, message: String },

    /// Transport-level failure talking to a remote endpoint (wraps reqwest::Error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Webhook endpoint answered with a non-success status
    #[error("Webhook error {status}: {message}")]
    Webhook { status: u16, message: String },

    /// JSON encode/decode error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True for failures of the remote store or transport, as opposed to
    /// local input or configuration problems
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Store { .. } | Error::Http(_) | Error::Webhook { .. })
    }
}
