//! Error types for the Yahoo fetcher

use thiserror::Error;

/// Result type alias for fetcher operations
pub type Result<T> = std::result::Result<T, FetcherError>;

/// Errors that can occur while talking to the Yahoo Fantasy API
#[derive(Error, Debug)]
pub enum FetcherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Yahoo API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Token refresh failed: {0}")]
    Auth(String),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetcherError {
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::UnexpectedShape(msg.into())
    }
}
