//! Stored ranking queries

use rankings_store::{RankingStore, Season, StoredRanking};
use serde::Serialize;

use crate::error::{Result, ServiceError};

/// A stored row with its position in the ranking
#[derive(Debug, Clone, Serialize)]
pub struct RankedRow {
    #[serde(flatten)]
    pub row: StoredRanking,
    pub rank: usize,
    pub team_name: String,
}

/// Body of `GET /power-rankings`
#[derive(Debug, Clone, Serialize)]
pub struct PowerRankingsResponse {
    pub season: Season,
    pub season_stats: Vec<StoredRanking>,
    pub power_rankings: Vec<RankedRow>,
}

/// Sort rows by total descending and number them from 1. Equal totals keep
/// their stored order.
pub fn annotate_ranks(rows: &[StoredRanking]) -> Vec<RankedRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.entry.total.total_cmp(&a.entry.total));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let team_name = row.entry.name.clone();
            RankedRow { row, rank: i + 1, team_name }
        })
        .collect()
}

/// Load the ranking of `year`, or of the latest season when no year is given
pub async fn load_power_rankings(
    store: &dyn RankingStore,
    year: Option<i32>,
) -> Result<PowerRankingsResponse> {
    let season = match year {
        Some(year) => store.season_by_year(year).await?,
        None => store.latest_season().await?,
    }
    .ok_or(ServiceError::SeasonNotFound(year))?;

    let season_stats = store.season_rankings(season.id).await?;
    if season_stats.is_empty() {
        return Err(ServiceError::NoStats(season.year));
    }

    let power_rankings = annotate_ranks(&season_stats);
    Ok(PowerRankingsResponse { season, season_stats, power_rankings })
}
