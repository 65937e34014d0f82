//! Error types for the ranking engine

use thiserror::Error;

/// Result type alias for ranking operations
pub type Result<T> = std::result::Result<T, RankingError>;

/// Errors produced by the ranking engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    /// A weekly row is missing a required field or carries an invalid value
    #[error("Malformed weekly row {index}: {reason}")]
    MalformedRow { index: usize, reason: String },

    /// Composition was asked to rank a season with no teams
    #[error("Cannot compose a ranking for an empty roster")]
    EmptyRoster,
}

impl RankingError {
    /// Create a new malformed row error
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow { index, reason: reason.into() }
    }
}
