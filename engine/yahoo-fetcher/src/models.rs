use chrono::{DateTime, Utc};
use power_rankings::TeamId;
use serde::{Deserialize, Serialize};

/// OAuth token response from Yahoo
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// Access token with its expiry
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Margin before expiry at which the token is treated as stale
    pub const REFRESH_MARGIN_SECS: i64 = 60;

    pub fn from_response(response: &TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token.clone(),
            expires_at: now + chrono::Duration::seconds(response.expires_in as i64),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(Self::REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// One team's side of a matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupTeam {
    pub team_id: TeamId,
    pub name: String,
    pub points: f64,
}

/// A scheduled head-to-head matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub teams: Vec<MatchupTeam>,
}

/// All matchups of one league week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekScoreboard {
    pub week: u32,
    pub matchups: Vec<Matchup>,
}

impl WeekScoreboard {
    /// Every team that played this week, in matchup order
    pub fn teams(&self) -> impl Iterator<Item = &MatchupTeam> {
        self.matchups.iter().flat_map(|m| m.teams.iter())
    }
}

/// League metadata relevant to a refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueInfo {
    pub league_key: String,
    pub name: String,
    pub season: Option<i32>,
    pub current_week: u32,
    /// Set once the league's final week is complete
    pub is_finished: bool,
}

impl LeagueInfo {
    /// Last week whose matchups are final. The current week is still being
    /// played until the league finishes.
    pub fn last_completed_week(&self) -> u32 {
        if self.is_finished {
            self.current_week
        } else {
            self.current_week.saturating_sub(1)
        }
    }
}
