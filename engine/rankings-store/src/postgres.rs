//! Postgres store (tables in `schema.sql`)

use chrono::{DateTime, Utc};
use power_rankings::{PowerRankingEntry, TeamId};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::info;

use crate::backend::RankingStore;
use crate::error::{Result, StoreError};
use crate::models::{Season, StoredRanking};

/// Ranking store backed by Postgres
#[derive(Debug, Clone)]
pub struct PgRankingStore {
    pool: PgPool,
}

impl PgRankingStore {
    /// Connect a new pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        info!("Connected rankings store to database");
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn to_column(value: u32, column: &str) -> Result<i32> {
        i32::try_from(value)
            .map_err(|_| StoreError::InvalidData(format!("{column} {value} exceeds column range")))
    }

    fn season_from_row(row: &PgRow) -> Result<Season> {
        Ok(Season {
            id: row.try_get("id")?,
            year: row.try_get("year")?,
            league_key: row.try_get("league_key")?,
        })
    }

    fn ranking_from_row(row: &PgRow) -> Result<StoredRanking> {
        let team_id: i32 = row.try_get("yahoo_team_id")?;
        let team_id = u32::try_from(team_id)
            .map_err(|_| StoreError::InvalidData(format!("negative team id {team_id}")))?;
        let count = |column: &str| -> Result<u32> {
            let value: i32 = row.try_get(column)?;
            u32::try_from(value)
                .map_err(|_| StoreError::InvalidData(format!("negative {column} {value}")))
        };

        let entry = PowerRankingEntry {
            team_id: TeamId(team_id),
            name: row.try_get("name")?,
            wins: count("wins")?,
            points_for: row.try_get("points_for")?,
            head_to_head_wins: count("h2h_wins")?,
            category_wins: row.try_get("category_wins")?,
            category_points_for: row.try_get("category_points_for")?,
            category_h2h: row.try_get("category_h2h")?,
            total: row.try_get("total")?,
        };
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

        Ok(StoredRanking { season_id: row.try_get("season_id")?, entry, updated_at })
    }
}

#[async_trait::async_trait]
impl RankingStore for PgRankingStore {
    async fn upsert_season(&self, year: i32, league_key: &str) -> Result<Season> {
        let row = sqlx::query(
            r#"
            INSERT INTO seasons (year, league_key)
            VALUES ($1, $2)
            ON CONFLICT (year) DO UPDATE SET league_key = EXCLUDED.league_key
            RETURNING id, year, league_key
            "#,
        )
        .bind(year)
        .bind(league_key)
        .fetch_one(&self.pool)
        .await?;

        Self::season_from_row(&row)
    }

    async fn replace_season_rankings(
        &self,
        season: &Season,
        entries: &[PowerRankingEntry],
    ) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM season_stats WHERE season_id = $1")
            .bind(season.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM teams WHERE season_id = $1")
            .bind(season.id)
            .execute(&mut *tx)
            .await?;

        let updated_at = Utc::now();
        for entry in entries {
            let yahoo_team_id = Self::to_column(entry.team_id.0, "team id")?;
            let wins = Self::to_column(entry.wins, "wins")?;
            let head_to_head_wins = Self::to_column(entry.head_to_head_wins, "h2h_wins")?;

            let team_row_id: i64 = sqlx::query_scalar(
                "INSERT INTO teams (season_id, yahoo_team_id, name) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(season.id)
            .bind(yahoo_team_id)
            .bind(&entry.name)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO season_stats (season_id, team_id, wins, points_for, h2h_wins,
                    category_wins, category_points_for, category_h2h, total, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(season.id)
            .bind(team_row_id)
            .bind(wins)
            .bind(entry.points_for)
            .bind(head_to_head_wins)
            .bind(entry.category_wins)
            .bind(entry.category_points_for)
            .bind(entry.category_h2h)
            .bind(entry.total)
            .bind(updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Replaced {} ranking rows for season {}", entries.len(), season.year);
        Ok(entries.len())
    }

    async fn latest_season(&self) -> Result<Option<Season>> {
        let row = sqlx::query("SELECT id, year, league_key FROM seasons ORDER BY year DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::season_from_row).transpose()
    }

    async fn season_by_year(&self, year: i32) -> Result<Option<Season>> {
        let row = sqlx::query("SELECT id, year, league_key FROM seasons WHERE year = $1")
            .bind(year)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::season_from_row).transpose()
    }

    async fn season_rankings(&self, season_id: i64) -> Result<Vec<StoredRanking>> {
        let rows = sqlx::query(
            r#"
            SELECT s.season_id, t.yahoo_team_id, t.name, s.wins, s.points_for, s.h2h_wins,
                   s.category_wins, s.category_points_for, s.category_h2h, s.total, s.updated_at
            FROM season_stats s
            JOIN teams t ON t.id = s.team_id
            WHERE s.season_id = $1
            ORDER BY s.total DESC, s.id ASC
            "#,
        )
        .bind(season_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::ranking_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_within_range_convert() {
        assert_eq!(PgRankingStore::to_column(14, "wins").unwrap(), 14);
        assert_eq!(PgRankingStore::to_column(i32::MAX as u32, "wins").unwrap(), i32::MAX);
    }

    #[test]
    fn test_counts_above_column_range_are_rejected() {
        let err = PgRankingStore::to_column(u32::MAX, "h2h_wins").unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(msg) if msg.contains("h2h_wins")));
    }
}
