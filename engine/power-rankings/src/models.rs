use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RankingError, Result};

/// Provider-assigned team identifier, unique within a season
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TeamId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A team in one season's league
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: TeamId,
    pub name: String,
    pub season: i32,
}

impl Team {
    pub fn new(team_id: impl Into<TeamId>, name: impl Into<String>, season: i32) -> Self {
        Self { team_id: team_id.into(), name: name.into(), season }
    }
}

/// Weekly result row as it arrives from the parsing stage, before validation.
///
/// Every field is optional so that a missing value is reported as a malformed
/// row rather than a deserialization failure of the whole batch. `team_id`
/// accepts both a JSON number and a numeric string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRow {
    pub season: Option<i32>,
    pub team_id: Option<serde_json::Value>,
    pub week: Option<u32>,
    pub wins: Option<i64>,
    pub points_for: Option<f64>,
    pub head_to_head_wins: Option<i64>,
}

/// Validated result of one team in one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyResult {
    pub season: i32,
    pub team_id: TeamId,
    pub week: u32,
    pub wins: u32,
    pub points_for: f64,
    pub head_to_head_wins: u32,
}

impl WeeklyRow {
    /// Build a fully populated row
    pub fn new(
        season: i32,
        team_id: TeamId,
        week: u32,
        wins: u32,
        points_for: f64,
        head_to_head_wins: u32,
    ) -> Self {
        Self {
            season: Some(season),
            team_id: Some(serde_json::Value::from(team_id.0)),
            week: Some(week),
            wins: Some(i64::from(wins)),
            points_for: Some(points_for),
            head_to_head_wins: Some(i64::from(head_to_head_wins)),
        }
    }

    /// Validate the row. `index` is the row's position in its batch and is
    /// only used for error reporting.
    pub fn validate(&self, index: usize) -> Result<WeeklyResult> {
        let season = self.season.ok_or_else(|| RankingError::malformed(index, "missing season"))?;
        let team_id = parse_team_id(self.team_id.as_ref(), index)?;
        let week = self.week.ok_or_else(|| RankingError::malformed(index, "missing week"))?;
        let wins = non_negative_count(self.wins, "wins", index)?;
        let head_to_head_wins =
            non_negative_count(self.head_to_head_wins, "head_to_head_wins", index)?;

        let points_for =
            self.points_for.ok_or_else(|| RankingError::malformed(index, "missing points_for"))?;
        if !points_for.is_finite() || points_for < 0.0 {
            return Err(RankingError::malformed(
                index,
                format!("points_for must be a non-negative number, got {points_for}"),
            ));
        }

        Ok(WeeklyResult { season, team_id, week, wins, points_for, head_to_head_wins })
    }
}

fn parse_team_id(value: Option<&serde_json::Value>, index: usize) -> Result<TeamId> {
    let value = value.ok_or_else(|| RankingError::malformed(index, "missing team_id"))?;
    let id = match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    id.map(TeamId)
        .ok_or_else(|| RankingError::malformed(index, format!("team_id is not a team number: {value}")))
}

fn non_negative_count(value: Option<i64>, field: &str, index: usize) -> Result<u32> {
    let value = value.ok_or_else(|| RankingError::malformed(index, format!("missing {field}")))?;
    u32::try_from(value)
        .map_err(|_| RankingError::malformed(index, format!("{field} must be >= 0, got {value}")))
}

/// Season-long totals for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub team_id: TeamId,
    pub wins: u32,
    pub points_for: f64,
    pub head_to_head_wins: u32,
}

impl SeasonTotals {
    /// Zeroed totals for a team with no results yet
    pub fn empty(team_id: TeamId) -> Self {
        Self { team_id, wins: 0, points_for: 0.0, head_to_head_wins: 0 }
    }

    /// Fold one weekly result into the running totals.
    ///
    /// Points are kept at hundredths, the provider's precision, so equal
    /// season points compare equal whatever order the weeks were added in.
    pub fn add(&mut self, result: &WeeklyResult) {
        self.wins += result.wins;
        self.points_for = round_points(self.points_for + result.points_for);
        self.head_to_head_wins += result.head_to_head_wins;
    }

    /// Value of the given metric as a comparable number
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Wins => f64::from(self.wins),
            Metric::PointsFor => self.points_for,
            Metric::HeadToHead => f64::from(self.head_to_head_wins),
        }
    }
}

/// Round a points value to hundredths
pub fn round_points(points: f64) -> f64 {
    (points * 100.0).round() / 100.0
}

/// The three performance signals a power ranking blends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Wins,
    PointsFor,
    HeadToHead,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Wins, Metric::PointsFor, Metric::HeadToHead];
}

/// Rank score per team for a single metric
pub type CategoryScore = std::collections::BTreeMap<TeamId, f64>;

/// One row of the final power ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerRankingEntry {
    pub team_id: TeamId,
    pub name: String,
    pub wins: u32,
    pub points_for: f64,
    #[serde(rename = "h2h_wins")]
    pub head_to_head_wins: u32,
    pub category_wins: f64,
    pub category_points_for: f64,
    pub category_h2h: f64,
    pub total: f64,
}
