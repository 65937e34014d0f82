use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FetcherError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://fantasysports.yahooapis.com/fantasy/v2";
pub const DEFAULT_TOKEN_URL: &str = "https://api.login.yahoo.com/oauth2/get_token";

/// Configuration for the Yahoo Fantasy Sports client
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// OAuth application client id
    pub client_id: String,

    /// OAuth application client secret
    pub client_secret: String,

    /// Long-lived refresh token obtained through the authorization callback
    pub refresh_token: String,

    /// League key, e.g. "461.l.49894" (`{game_key}.l.{league_id}`)
    pub league_key: String,

    /// Fantasy API base URL
    pub api_base_url: String,

    /// OAuth token endpoint
    pub token_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            league_key: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

// Credentials stay out of logs
impl fmt::Debug for FetcherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetcherConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("league_key", &self.league_key)
            .field("api_base_url", &self.api_base_url)
            .field("token_url", &self.token_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl FetcherConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment variables that are present
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(client_id) = std::env::var("YAHOO_CLIENT_ID") {
            self.client_id = client_id;
        }

        if let Ok(client_secret) = std::env::var("YAHOO_CLIENT_SECRET") {
            self.client_secret = client_secret;
        }

        if let Ok(refresh_token) = std::env::var("YAHOO_REFRESH_TOKEN") {
            self.refresh_token = refresh_token;
        }

        if let Ok(league_key) = std::env::var("YAHOO_LEAGUE_KEY") {
            self.league_key = league_key;
        } else if let Ok(league_id) = std::env::var("YAHOO_LEAGUE_ID") {
            let game_key = std::env::var("YAHOO_GAME_KEY").unwrap_or_else(|_| "nfl".to_string());
            self.league_key = league_key_for(&game_key, &league_id);
        }

        if let Ok(timeout) = std::env::var("YAHOO_TIMEOUT_SECS") {
            self.timeout_secs = timeout
                .parse()
                .map_err(|_| FetcherError::Config(format!("Invalid YAHOO_TIMEOUT_SECS: {timeout}")))?;
        }

        Ok(())
    }

    /// Check that every credential needed for a refresh is present
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("YAHOO_CLIENT_ID", &self.client_id),
            ("YAHOO_CLIENT_SECRET", &self.client_secret),
            ("YAHOO_REFRESH_TOKEN", &self.refresh_token),
            ("YAHOO_LEAGUE_KEY", &self.league_key),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(FetcherError::Config(format!("{name} not set")));
            }
        }

        if self.timeout_secs == 0 {
            return Err(FetcherError::Config("timeout_secs must be greater than zero".to_string()));
        }

        Ok(())
    }
}

/// Build a league key from a game key ("nfl" or a season's numeric game id)
pub fn league_key_for(game_key: &str, league_id: &str) -> String {
    format!("{game_key}.l.{league_id}")
}
