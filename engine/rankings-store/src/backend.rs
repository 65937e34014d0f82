//! Store trait shared by the Postgres and in-memory backends

use power_rankings::PowerRankingEntry;

use crate::error::Result;
use crate::models::{Season, StoredRanking};

/// Persistence sink and query source for season rankings
#[async_trait::async_trait]
pub trait RankingStore: Send + Sync {
    /// Get the season for `year`, creating it if needed
    async fn upsert_season(&self, year: i32, league_key: &str) -> Result<Season>;

    /// Replace every stored ranking row of a season with `entries`.
    ///
    /// Readers observe either the previous ranking or the new one, never a mix.
    /// Returns the number of rows written.
    async fn replace_season_rankings(
        &self,
        season: &Season,
        entries: &[PowerRankingEntry],
    ) -> Result<usize>;

    /// Most recent season by year
    async fn latest_season(&self) -> Result<Option<Season>>;

    /// Season for a specific year
    async fn season_by_year(&self, year: i32) -> Result<Option<Season>>;

    /// Stored rows of a season, ordered by total descending
    async fn season_rankings(&self, season_id: i64) -> Result<Vec<StoredRanking>>;
}
