//! Upstream league data

use power_rankings::{Team, WeeklyRow};
use yahoo_fetcher::{derive_weekly_rows, LeagueInfo, YahooClient};

use crate::error::Result;

/// Source of a league's roster and weekly results
#[async_trait::async_trait]
pub trait LeagueDataSource: Send + Sync {
    /// Provider key of the league being ranked
    fn league_key(&self) -> &str;

    /// League metadata, including its season and current week
    async fn fetch_league_info(&self) -> Result<LeagueInfo>;

    /// Every team of the league for a season
    async fn fetch_teams(&self, season: i32) -> Result<Vec<Team>>;

    /// One result row per team that played in `week`
    async fn fetch_week(&self, season: i32, week: u32) -> Result<Vec<WeeklyRow>>;
}

#[async_trait::async_trait]
impl LeagueDataSource for YahooClient {
    fn league_key(&self) -> &str {
        YahooClient::league_key(self)
    }

    async fn fetch_league_info(&self) -> Result<LeagueInfo> {
        Ok(YahooClient::fetch_league_info(self).await?)
    }

    async fn fetch_teams(&self, season: i32) -> Result<Vec<Team>> {
        Ok(YahooClient::fetch_teams(self, season).await?)
    }

    async fn fetch_week(&self, season: i32, week: u32) -> Result<Vec<WeeklyRow>> {
        let scoreboard = self.fetch_scoreboard(week).await?;
        Ok(derive_weekly_rows(season, &scoreboard))
    }
}
