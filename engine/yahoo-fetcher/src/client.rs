use chrono::Utc;
use power_rankings::Team;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration as StdDuration;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::FetcherConfig;
use crate::error::{FetcherError, Result};
use crate::models::{CachedToken, LeagueInfo, TokenResponse, WeekScoreboard};
use crate::parser;

/// Client for the Yahoo Fantasy Sports API
pub struct YahooClient {
    config: FetcherConfig,
    client: Client,
    token: Mutex<Option<CachedToken>>,
}

impl YahooClient {
    /// Create a new client instance
    pub fn new(config: FetcherConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client, token: Mutex::new(None) })
    }

    pub fn league_key(&self) -> &str {
        &self.config.league_key
    }

    /// Exchange the refresh token for a new access token
    pub async fn refresh_access_token(&self) -> Result<CachedToken> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.config.refresh_token.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        info!("Refreshing Yahoo access token for client {}", self.config.client_id);

        let response = self.client.post(&self.config.token_url).form(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Yahoo token refresh failed: {} - {}", status, body);
            return Err(FetcherError::Auth(format!("token endpoint returned {status}: {body}")));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        let cached = CachedToken::from_response(&token, Utc::now());

        info!("Yahoo access token refreshed, expires at {}", cached.expires_at);
        Ok(cached)
    }

    /// Current access token, refreshed when missing or about to expire
    pub async fn access_token(&self) -> Result<String> {
        let mut token = self.token.lock().await;
        if let Some(cached) = token.as_ref() {
            if cached.is_fresh(Utc::now()) {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.refresh_access_token().await?;
        let access_token = fresh.access_token.clone();
        *token = Some(fresh);
        Ok(access_token)
    }

    /// GET a league resource as JSON
    async fn get_league_resource(&self, resource: &str) -> Result<Value> {
        let url = format!(
            "{}/league/{}{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.league_key,
            resource
        );
        let access_token = self.access_token().await?;

        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("format", "json")])
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Yahoo API request {} failed: {} - {}", url, status, body);
            return Err(FetcherError::Status { status: status.as_u16(), body });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the league's teams for a season
    pub async fn fetch_teams(&self, season: i32) -> Result<Vec<Team>> {
        let root = self.get_league_resource("/teams").await?;
        let teams = parser::parse_teams(&root, season)?;

        info!("Fetched {} teams for league {}", teams.len(), self.config.league_key);
        Ok(teams)
    }

    /// Fetch league metadata (name, season, current week)
    pub async fn fetch_league_info(&self) -> Result<LeagueInfo> {
        let root = self.get_league_resource("").await?;
        parser::parse_league_info(&root)
    }

    /// Fetch the scoreboard of one week
    pub async fn fetch_scoreboard(&self, week: u32) -> Result<WeekScoreboard> {
        let root = self.get_league_resource(&format!("/scoreboard;week={week}")).await?;
        let scoreboard = parser::parse_scoreboard(&root, week)?;

        info!("Fetched {} matchups for week {}", scoreboard.matchups.len(), week);
        Ok(scoreboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> FetcherConfig {
        FetcherConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
            league_key: "461.l.49894".to_string(),
            ..FetcherConfig::default()
        }
    }

    #[test]
    fn test_new_rejects_incomplete_config() {
        let result = YahooClient::new(FetcherConfig::default());
        assert!(matches!(result, Err(FetcherError::Config(_))));
    }

    #[test]
    fn test_new_with_complete_config() {
        let client = YahooClient::new(config()).unwrap();
        assert_eq!(client.league_key(), "461.l.49894");
    }

    #[test]
    fn test_cached_token_is_reused() {
        let client = YahooClient::new(config()).unwrap();
        let cached = CachedToken {
            access_token: "cached-token".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        };

        tokio_test::block_on(async {
            *client.token.lock().await = Some(cached);
            assert_eq!(client.access_token().await.unwrap(), "cached-token");
        });
    }

    /// Serve a filter on an ephemeral local port and evaluate to its base URL
    macro_rules! serve {
        ($routes:expr) => {{
            let (addr, server) = warp::serve($routes).bind_ephemeral(([127, 0, 0, 1], 0));
            tokio::spawn(server);
            format!("http://{addr}")
        }};
    }

    fn client_for(base: &str) -> YahooClient {
        YahooClient::new(FetcherConfig {
            api_base_url: base.to_string(),
            token_url: format!("{base}/token"),
            ..config()
        })
        .unwrap()
    }

    async fn with_cached_token(client: &YahooClient) {
        *client.token.lock().await = Some(CachedToken {
            access_token: "cached-token".to_string(),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        });
    }

    #[tokio::test]
    async fn test_refresh_posts_refresh_token_grant() {
        use warp::Filter;

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let token = warp::path("token")
            .and(warp::post())
            .and(warp::body::form::<HashMap<String, String>>())
            .map(move |form: HashMap<String, String>| {
                let _ = tx.send(form);
                warp::reply::json(&serde_json::json!({
                    "access_token": "fresh-token",
                    "token_type": "bearer",
                    "expires_in": 3600
                }))
            });
        let client = client_for(&serve!(token));

        assert_eq!(client.access_token().await.unwrap(), "fresh-token");

        let form = rx.recv().await.unwrap();
        assert_eq!(form["grant_type"], "refresh_token");
        assert_eq!(form["refresh_token"], "refresh");
        assert_eq!(form["client_id"], "client");
        assert_eq!(form["client_secret"], "secret");
    }

    #[tokio::test]
    async fn test_rejected_refresh_is_auth_error() {
        use warp::Filter;

        let token = warp::path("token").and(warp::post()).map(|| {
            warp::reply::with_status("invalid_grant", warp::http::StatusCode::UNAUTHORIZED)
        });
        let client = client_for(&serve!(token));

        let err = client.refresh_access_token().await.unwrap_err();
        assert!(matches!(err, FetcherError::Auth(msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_unparseable_token_body_is_json_error() {
        use warp::Filter;

        let token = warp::path("token").and(warp::post()).map(|| "not json");
        let client = client_for(&serve!(token));

        let err = client.refresh_access_token().await.unwrap_err();
        assert!(matches!(err, FetcherError::Json(_)));
    }

    #[tokio::test]
    async fn test_league_request_sends_bearer_and_json_format() {
        use warp::Filter;

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let league = warp::path("league")
            .and(warp::path::param::<String>())
            .and(warp::path::end())
            .and(warp::get())
            .and(warp::header::<String>("authorization"))
            .and(warp::query::<HashMap<String, String>>())
            .map(move |key: String, auth: String, query: HashMap<String, String>| {
                let _ = tx.send((key, auth, query));
                warp::reply::json(&serde_json::json!({
                    "fantasy_content": { "league": [{
                        "league_key": "461.l.49894",
                        "name": "Sunday Scaries",
                        "season": "2025",
                        "current_week": 7
                    }] }
                }))
            });
        let client = client_for(&serve!(league));
        with_cached_token(&client).await;

        let info = client.fetch_league_info().await.unwrap();
        assert_eq!(info.current_week, 7);

        let (key, auth, query) = rx.recv().await.unwrap();
        assert_eq!(key, "461.l.49894");
        assert_eq!(auth, "Bearer cached-token");
        assert_eq!(query.get("format").map(String::as_str), Some("json"));
    }

    #[tokio::test]
    async fn test_failed_league_request_is_status_error() {
        use warp::Filter;

        let league = warp::path("league").map(|| {
            warp::reply::with_status("maintenance", warp::http::StatusCode::SERVICE_UNAVAILABLE)
        });
        let client = client_for(&serve!(league));
        with_cached_token(&client).await;

        let err = client.fetch_teams(2025).await.unwrap_err();
        assert!(matches!(
            err,
            FetcherError::Status { status: 503, ref body } if body == "maintenance"
        ));
    }
}
