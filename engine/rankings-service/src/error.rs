//! Error types for the rankings service

use thiserror::Error;

/// Errors that can occur while refreshing or serving rankings
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Upstream error: {0}")]
    Fetcher(#[from] yahoo_fetcher::FetcherError),

    #[error("Store error: {0}")]
    Store(#[from] rankings_store::StoreError),

    #[error("Ranking error: {0}")]
    Ranking(#[from] power_rankings::RankingError),

    #[error("Season not found")]
    SeasonNotFound(Option<i32>),

    #[error("No season stats found for season {0}")]
    NoStats(i32),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for ServiceError {
    fn from(err: config::ConfigError) -> Self {
        ServiceError::Config(err.to_string())
    }
}

impl ServiceError {
    /// Stable machine-readable code used in error bodies
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Fetcher(_) => "UPSTREAM_ERROR",
            ServiceError::Store(_) => "STORE_ERROR",
            ServiceError::Ranking(_) => "RANKING_ERROR",
            ServiceError::SeasonNotFound(_) => "SEASON_NOT_FOUND",
            ServiceError::NoStats(_) => "NO_SEASON_STATS",
            ServiceError::Config(_) => "CONFIG_ERROR",
        }
    }
}

/// Rejections raised by route handlers
#[derive(Debug)]
pub enum ApiRejection {
    Service(ServiceError),
    MissingCode,
}

impl warp::reject::Reject for ApiRejection {}

impl From<ServiceError> for ApiRejection {
    fn from(err: ServiceError) -> Self {
        ApiRejection::Service(err)
    }
}

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
