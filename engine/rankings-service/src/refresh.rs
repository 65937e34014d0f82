//! Ranking refresh
//!
//! A refresh pulls the roster and every played week from the data source,
//! recomputes the season's power ranking and replaces the stored copy. At most
//! one refresh runs per season at a time.

use chrono::Datelike;
use dashmap::DashMap;
use power_rankings::{aggregate, compose, ScoringOptions, Team, TeamId};
use rankings_store::RankingStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::ScoringConfig;
use crate::error::Result;
use crate::source::LeagueDataSource;

/// Outcome of a completed refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub season: i32,
    pub teams: usize,
    pub weeks: u32,
}

/// Recomputes and stores season rankings
pub struct RefreshService {
    source: Arc<dyn LeagueDataSource>,
    store: Arc<dyn RankingStore>,
    scoring: ScoringConfig,
    season_locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl RefreshService {
    pub fn new(
        source: Arc<dyn LeagueDataSource>,
        store: Arc<dyn RankingStore>,
        scoring: ScoringConfig,
    ) -> Self {
        Self { source, store, scoring, season_locks: DashMap::new() }
    }

    /// Season year and last week to include
    async fn resolve_window(&self) -> Result<(i32, u32)> {
        if let (Some(season), Some(week)) = (self.scoring.season_year, self.scoring.current_week) {
            return Ok((season, week));
        }

        let info = self.source.fetch_league_info().await?;
        let season = self
            .scoring
            .season_year
            .or(info.season)
            .unwrap_or_else(|| chrono::Utc::now().year());
        let week = self.scoring.current_week.unwrap_or_else(|| info.last_completed_week());

        debug!("League {} is in week {} of season {}", info.league_key, info.current_week, season);
        Ok((season, week))
    }

    fn season_lock(&self, season: i32) -> Arc<Mutex<()>> {
        self.season_locks.entry(season).or_default().clone()
    }

    /// Recompute the current season's ranking and replace the stored copy
    pub async fn refresh(&self) -> Result<RefreshSummary> {
        let (season_year, last_week) = self.resolve_window().await?;

        let lock = self.season_lock(season_year);
        let _guard = lock.lock().await;

        info!("Refreshing power rankings for season {} through week {}", season_year, last_week);

        let teams = self.source.fetch_teams(season_year).await?;

        let mut rows = Vec::new();
        for week in 1..=last_week {
            let week_rows = self.source.fetch_week(season_year, week).await?;
            debug!("Week {} returned {} rows", week, week_rows.len());
            rows.extend(week_rows);
        }

        let roster: Vec<TeamId> = teams.iter().map(|t| t.team_id).collect();
        let metadata: HashMap<TeamId, Team> =
            teams.into_iter().map(|t| (t.team_id, t)).collect();

        let totals = aggregate(&rows, &roster)?;
        let options = ScoringOptions { max_points: self.scoring.max_points };
        let entries = compose(&totals, &metadata, &options);

        let season = self.store.upsert_season(season_year, self.source.league_key()).await?;
        let written = self.store.replace_season_rankings(&season, &entries).await?;

        info!("Power rankings refreshed: season {}, {} teams, {} weeks", season_year, written, last_week);

        Ok(RefreshSummary { season: season_year, teams: written, weeks: last_week })
    }
}
