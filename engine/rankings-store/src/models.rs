use chrono::{DateTime, Utc};
use power_rankings::PowerRankingEntry;
use serde::{Deserialize, Serialize};

/// A league season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    pub year: i32,
    pub league_key: String,
}

/// A persisted ranking row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRanking {
    pub season_id: i64,
    #[serde(flatten)]
    pub entry: PowerRankingEntry,
    pub updated_at: DateTime<Utc>,
}
