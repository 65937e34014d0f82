//! Power Rankings Engine
//!
//! Turns per-week fantasy results into a season power ranking. Three signals are
//! blended: cumulative wins, cumulative points scored and cumulative head-to-head
//! strength. Each signal is converted into a tie-aware rank score and the three
//! scores are summed into a single total per team.
//!
//! Everything in this crate is a pure, synchronous transformation of in-memory
//! data; fetching and persistence live in the service crates.

pub mod aggregator;
pub mod composer;
pub mod error;
pub mod models;
pub mod scorer;

pub use aggregator::{aggregate, aggregate_results, SeasonTotalsTable};
pub use composer::{compose, compose_non_empty, ScoringOptions};
pub use error::{RankingError, Result};
pub use models::*;
pub use scorer::score;
