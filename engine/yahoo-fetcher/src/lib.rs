//! Yahoo Fantasy Sports Fetcher
//!
//! Pulls a league's teams and weekly scoreboards from the Yahoo Fantasy Sports
//! API and turns them into the typed rows the ranking engine consumes. The
//! provider's nested JSON is flattened by [`parser`]; per-week wins and
//! head-to-head counts are derived in [`weekly`].

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod weekly;

pub use client::YahooClient;
pub use config::FetcherConfig;
pub use error::{FetcherError, Result};
pub use models::*;
pub use weekly::derive_weekly_rows;
