//! In-memory store, used by tests and by servers started without a database

use chrono::Utc;
use parking_lot::RwLock;
use power_rankings::PowerRankingEntry;
use std::collections::HashMap;

use crate::backend::RankingStore;
use crate::error::{Result, StoreError};
use crate::models::{Season, StoredRanking};

#[derive(Debug, Default)]
struct MemoryState {
    seasons: Vec<Season>,
    rankings: HashMap<i64, Vec<StoredRanking>>,
    next_season_id: i64,
}

/// Ranking store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryRankingStore {
    state: RwLock<MemoryState>,
}

impl MemoryRankingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RankingStore for MemoryRankingStore {
    async fn upsert_season(&self, year: i32, league_key: &str) -> Result<Season> {
        let mut state = self.state.write();

        if let Some(season) = state.seasons.iter_mut().find(|s| s.year == year) {
            season.league_key = league_key.to_string();
            return Ok(season.clone());
        }

        state.next_season_id += 1;
        let season = Season { id: state.next_season_id, year, league_key: league_key.to_string() };
        state.seasons.push(season.clone());
        Ok(season)
    }

    async fn replace_season_rankings(
        &self,
        season: &Season,
        entries: &[PowerRankingEntry],
    ) -> Result<usize> {
        let mut state = self.state.write();

        if !state.seasons.iter().any(|s| s.id == season.id) {
            return Err(StoreError::not_found(format!("season {}", season.id)));
        }

        let updated_at = Utc::now();
        let rows: Vec<StoredRanking> = entries
            .iter()
            .map(|entry| StoredRanking { season_id: season.id, entry: entry.clone(), updated_at })
            .collect();
        let written = rows.len();

        state.rankings.insert(season.id, rows);
        tracing::debug!("Stored {} ranking rows for season {}", written, season.year);
        Ok(written)
    }

    async fn latest_season(&self) -> Result<Option<Season>> {
        Ok(self.state.read().seasons.iter().max_by_key(|s| s.year).cloned())
    }

    async fn season_by_year(&self, year: i32) -> Result<Option<Season>> {
        Ok(self.state.read().seasons.iter().find(|s| s.year == year).cloned())
    }

    async fn season_rankings(&self, season_id: i64) -> Result<Vec<StoredRanking>> {
        let mut rows = self.state.read().rankings.get(&season_id).cloned().unwrap_or_default();
        rows.sort_by(|a, b| b.entry.total.total_cmp(&a.entry.total));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use power_rankings::TeamId;

    fn entry(team: u32, total: f64) -> PowerRankingEntry {
        PowerRankingEntry {
            team_id: TeamId(team),
            name: format!("Team {team}"),
            wins: 0,
            points_for: 0.0,
            head_to_head_wins: 0,
            category_wins: total / 3.0,
            category_points_for: total / 3.0,
            category_h2h: total / 3.0,
            total,
        }
    }

    #[tokio::test]
    async fn test_upsert_season_is_idempotent() {
        let store = MemoryRankingStore::new();

        let first = store.upsert_season(2025, "461.l.1").await.unwrap();
        let again = store.upsert_season(2025, "461.l.2").await.unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(again.league_key, "461.l.2");
        assert_eq!(store.season_by_year(2025).await.unwrap(), Some(again));
    }

    #[tokio::test]
    async fn test_replace_overwrites_previous_rows() {
        let store = MemoryRankingStore::new();
        let season = store.upsert_season(2025, "461.l.1").await.unwrap();

        store.replace_season_rankings(&season, &[entry(1, 5.0), entry(2, 7.0), entry(3, 6.0)]).await.unwrap();
        let written = store.replace_season_rankings(&season, &[entry(1, 4.0), entry(2, 2.0)]).await.unwrap();

        let rows = store.season_rankings(season.id).await.unwrap();
        assert_eq!(written, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].entry.team_id, TeamId(1));
    }

    #[tokio::test]
    async fn test_rankings_sorted_by_total() {
        let store = MemoryRankingStore::new();
        let season = store.upsert_season(2024, "449.l.9").await.unwrap();

        store.replace_season_rankings(&season, &[entry(1, 3.0), entry(2, 9.0), entry(3, 6.0)]).await.unwrap();

        let order: Vec<u32> = store
            .season_rankings(season.id)
            .await
            .unwrap()
            .iter()
            .map(|r| r.entry.team_id.0)
            .collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_latest_season_by_year() {
        let store = MemoryRankingStore::new();
        store.upsert_season(2025, "461.l.1").await.unwrap();
        store.upsert_season(2023, "423.l.1").await.unwrap();

        assert_eq!(store.latest_season().await.unwrap().map(|s| s.year), Some(2025));
        assert_eq!(store.season_by_year(2022).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_unknown_season_fails() {
        let store = MemoryRankingStore::new();
        let ghost = Season { id: 42, year: 2020, league_key: "x".to_string() };

        let err = store.replace_season_rankings(&ghost, &[entry(1, 1.0)]).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
