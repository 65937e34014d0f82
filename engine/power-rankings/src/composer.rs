//! Power ranking composition
//!
//! Scores wins, points-for and head-to-head independently over the same roster
//! and sums the three category scores into each team's total.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use crate::aggregator::SeasonTotalsTable;
use crate::error::{RankingError, Result};
use crate::models::{Metric, PowerRankingEntry, Team, TeamId};
use crate::scorer::score;

/// Knobs for category scoring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringOptions {
    /// Points for first place in each category. Defaults to the roster size;
    /// set it to the league size to score a partial roster on the full scale.
    pub max_points: Option<u32>,
}

/// Compose the ordered power ranking for a season.
///
/// Entries are ordered by total descending, then points-for descending, then
/// team id ascending. An empty roster yields an empty ranking.
pub fn compose(
    totals: &SeasonTotalsTable,
    metadata: &HashMap<TeamId, Team>,
    options: &ScoringOptions,
) -> Vec<PowerRankingEntry> {
    if totals.is_empty() {
        debug!("{}; returning an empty ranking", RankingError::EmptyRoster);
        return Vec::new();
    }

    let max_points = options.max_points.or(Some(totals.len() as u32));
    let category_wins = score(&totals.metric_values(Metric::Wins), max_points);
    let category_points = score(&totals.metric_values(Metric::PointsFor), max_points);
    let category_h2h = score(&totals.metric_values(Metric::HeadToHead), max_points);

    let mut entries: Vec<PowerRankingEntry> = totals
        .iter()
        .map(|t| {
            let wins = category_wins.get(&t.team_id).copied().unwrap_or_default();
            let points = category_points.get(&t.team_id).copied().unwrap_or_default();
            let h2h = category_h2h.get(&t.team_id).copied().unwrap_or_default();
            let name = metadata
                .get(&t.team_id)
                .map(|team| team.name.clone())
                .unwrap_or_else(|| format!("Team {}", t.team_id));

            PowerRankingEntry {
                team_id: t.team_id,
                name,
                wins: t.wins,
                points_for: t.points_for,
                head_to_head_wins: t.head_to_head_wins,
                category_wins: wins,
                category_points_for: points,
                category_h2h: h2h,
                total: wins + points + h2h,
            }
        })
        .collect();

    entries.sort_by(ranking_order);

    debug!(
        "Composed power ranking for {} teams (max points {:?})",
        entries.len(),
        max_points
    );
    entries
}

/// Like [`compose`], but reports an empty roster as an error
pub fn compose_non_empty(
    totals: &SeasonTotalsTable,
    metadata: &HashMap<TeamId, Team>,
    options: &ScoringOptions,
) -> Result<Vec<PowerRankingEntry>> {
    if totals.is_empty() {
        return Err(RankingError::EmptyRoster);
    }
    Ok(compose(totals, metadata, options))
}

fn ranking_order(a: &PowerRankingEntry, b: &PowerRankingEntry) -> Ordering {
    b.total
        .total_cmp(&a.total)
        .then_with(|| b.points_for.total_cmp(&a.points_for))
        .then_with(|| a.team_id.cmp(&b.team_id))
}
