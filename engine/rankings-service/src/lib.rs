//! Power Rankings Service
//!
//! Refreshes a fantasy league's power rankings from the Yahoo Fantasy Sports
//! API, stores them per season and serves them over HTTP.

pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod refresh;
pub mod routes;
pub mod source;

pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use logging::initialize_logging;
pub use query::{annotate_ranks, load_power_rankings, PowerRankingsResponse};
pub use refresh::{RefreshService, RefreshSummary};
pub use routes::create_routes;
pub use source::LeagueDataSource;
