//! Weekly aggregation
//!
//! Folds per-week team results into one season-total record per team.

use std::collections::HashMap;
use tracing::debug;

use crate::error::Result;
use crate::models::{Metric, SeasonTotals, TeamId, WeeklyResult, WeeklyRow};

/// Season totals keyed by team, in roster order.
///
/// Roster ids come first in the order they were supplied, followed by ids that
/// only appeared in weekly rows, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonTotalsTable {
    totals: Vec<SeasonTotals>,
    index: HashMap<TeamId, usize>,
}

impl SeasonTotalsTable {
    /// Create a table with zeroed totals for every roster id
    pub fn with_roster(team_ids: &[TeamId]) -> Self {
        let mut table = Self::default();
        for &team_id in team_ids {
            table.entry(team_id);
        }
        table
    }

    fn entry(&mut self, team_id: TeamId) -> &mut SeasonTotals {
        let slot = match self.index.get(&team_id) {
            Some(&slot) => slot,
            None => {
                self.totals.push(SeasonTotals::empty(team_id));
                self.index.insert(team_id, self.totals.len() - 1);
                self.totals.len() - 1
            }
        };
        &mut self.totals[slot]
    }

    /// Add one validated weekly result, registering its team if unseen
    pub fn add(&mut self, result: &WeeklyResult) {
        if !self.index.contains_key(&result.team_id) {
            debug!("Weekly row references team {} outside the roster", result.team_id);
        }
        self.entry(result.team_id).add(result);
    }

    pub fn get(&self, team_id: TeamId) -> Option<&SeasonTotals> {
        self.index.get(&team_id).map(|&slot| &self.totals[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeasonTotals> {
        self.totals.iter()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Team ids in roster order
    pub fn team_ids(&self) -> Vec<TeamId> {
        self.totals.iter().map(|t| t.team_id).collect()
    }

    /// `(team, value)` pairs of one metric, in roster order
    pub fn metric_values(&self, metric: Metric) -> Vec<(TeamId, f64)> {
        self.totals.iter().map(|t| (t.team_id, t.metric(metric))).collect()
    }
}

/// Validate and aggregate raw weekly rows against the season roster.
///
/// Fails on the first malformed row; nothing is aggregated in that case.
pub fn aggregate(rows: &[WeeklyRow], team_ids: &[TeamId]) -> Result<SeasonTotalsTable> {
    let results = rows
        .iter()
        .enumerate()
        .map(|(index, row)| row.validate(index))
        .collect::<Result<Vec<_>>>()?;

    Ok(aggregate_results(&results, team_ids))
}

/// Aggregate already validated weekly results
pub fn aggregate_results(results: &[WeeklyResult], team_ids: &[TeamId]) -> SeasonTotalsTable {
    let mut table = SeasonTotalsTable::with_roster(team_ids);
    for result in results {
        table.add(result);
    }

    debug!(
        "Aggregated {} weekly results into totals for {} teams",
        results.len(),
        table.len()
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RankingError;

    fn result(team: u32, week: u32, wins: u32, points: f64, h2h: u32) -> WeeklyResult {
        WeeklyResult {
            season: 2025,
            team_id: TeamId(team),
            week,
            wins,
            points_for: points,
            head_to_head_wins: h2h,
        }
    }

    #[test]
    fn test_sums_weeks_per_team() {
        let results = vec![
            result(1, 1, 1, 120.5, 3),
            result(2, 1, 0, 98.0, 1),
            result(1, 2, 0, 101.25, 2),
            result(2, 2, 1, 110.0, 3),
        ];

        let table = aggregate_results(&results, &[TeamId(1), TeamId(2)]);

        let first = table.get(TeamId(1)).unwrap();
        assert_eq!(first.wins, 1);
        assert_eq!(first.points_for, 221.75);
        assert_eq!(first.head_to_head_wins, 5);

        let second = table.get(TeamId(2)).unwrap();
        assert_eq!(second.wins, 1);
        assert_eq!(second.points_for, 208.0);
        assert_eq!(second.head_to_head_wins, 4);
    }

    #[test]
    fn test_roster_team_without_rows_gets_zero_totals() {
        let results = vec![result(1, 1, 1, 120.0, 1)];

        let table = aggregate_results(&results, &[TeamId(1), TeamId(9)]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(TeamId(9)), Some(&SeasonTotals::empty(TeamId(9))));
    }

    #[test]
    fn test_unknown_team_is_appended_after_roster() {
        let results = vec![result(5, 1, 1, 90.0, 2), result(1, 1, 0, 80.0, 1)];

        let table = aggregate_results(&results, &[TeamId(2), TeamId(1)]);

        assert_eq!(table.team_ids(), vec![TeamId(2), TeamId(1), TeamId(5)]);
        assert_eq!(table.get(TeamId(5)).unwrap().points_for, 90.0);
    }

    #[test]
    fn test_duplicate_roster_ids_collapse() {
        let table = aggregate_results(&[], &[TeamId(3), TeamId(3), TeamId(4)]);
        assert_eq!(table.team_ids(), vec![TeamId(3), TeamId(4)]);
    }

    #[test]
    fn test_row_order_does_not_change_totals() {
        let forward = vec![result(1, 1, 1, 10.1, 1), result(1, 2, 0, 20.2, 0), result(2, 1, 0, 5.0, 0)];
        let mut backward = forward.clone();
        backward.reverse();

        let roster = [TeamId(1), TeamId(2)];
        let a = aggregate_results(&forward, &roster);
        let b = aggregate_results(&backward, &roster);

        for team in roster {
            let (x, y) = (a.get(team).unwrap(), b.get(team).unwrap());
            assert_eq!(x.wins, y.wins);
            assert_eq!(x.head_to_head_wins, y.head_to_head_wins);
            assert_eq!(x.points_for, y.points_for);
        }
    }

    #[test]
    fn test_week_order_does_not_split_equal_points() {
        let results = vec![
            result(1, 1, 0, 0.1, 0),
            result(1, 2, 0, 0.2, 0),
            result(1, 3, 0, 0.3, 0),
            result(2, 1, 0, 0.3, 0),
            result(2, 2, 0, 0.2, 0),
            result(2, 3, 0, 0.1, 0),
        ];

        let table = aggregate_results(&results, &[TeamId(1), TeamId(2)]);

        assert_eq!(table.get(TeamId(1)).unwrap().points_for, 0.6);
        assert_eq!(table.get(TeamId(2)).unwrap().points_for, 0.6);
    }

    #[test]
    fn test_malformed_row_is_rejected() {
        let mut bad = WeeklyRow::new(2025, TeamId(2), 1, 0, 88.0, 0);
        bad.wins = None;
        let rows = vec![WeeklyRow::new(2025, TeamId(1), 1, 1, 101.0, 1), bad];

        let err = aggregate(&rows, &[TeamId(1), TeamId(2)]).unwrap_err();
        assert_eq!(err, RankingError::malformed(1, "missing wins"));
    }

    #[test]
    fn test_aggregate_validates_then_sums() {
        let rows = vec![
            WeeklyRow::new(2025, TeamId(1), 1, 1, 101.0, 1),
            WeeklyRow::new(2025, TeamId(1), 2, 1, 99.0, 1),
        ];

        let table = aggregate(&rows, &[TeamId(1)]).unwrap();
        assert_eq!(table.get(TeamId(1)).unwrap().wins, 2);
        assert_eq!(table.metric_values(Metric::PointsFor), vec![(TeamId(1), 200.0)]);
    }
}
