//! Rankings Store
//!
//! Persists computed power rankings per season and serves them back to the
//! query API. A season's ranking is always replaced as a whole.

pub mod backend;
pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;

pub use backend::RankingStore;
pub use error::{Result, StoreError};
pub use memory::MemoryRankingStore;
pub use models::{Season, StoredRanking};
pub use postgres::PgRankingStore;
