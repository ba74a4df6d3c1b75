use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://prod.origin.api.stats.com/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    Nba,
    Wnba,
}

impl League {
    /// Path segment used by the season index endpoints
    pub fn path(&self) -> &'static str {
        match self {
            League::Nba => "nba",
            League::Wnba => "wnba",
        }
    }

    /// Path segment used by the play-by-play endpoint, which is upper-case
    pub fn event_path(&self) -> &'static str {
        match self {
            League::Nba => "NBA",
            League::Wnba => "WNBA",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nba" => Some(League::Nba),
            "wnba" => Some(League::Wnba),
            _ => None,
        }
    }
}

/// Connection settings for the stats API
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub league: League,
    /// Upper bound for a single HTTP request
    pub request_timeout: Duration,
}

impl ProviderConfig {
    /// Reads `STATS_API_BASE_URL`, `STATS_LEAGUE` and `STATS_API_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_env_var("STATS_API_BASE_URL")
    }

    /// Settings for the provider compared against in reconciliation.
    /// Returns `None` when `STATS_API_SECONDARY_URL` is unset.
    pub fn secondary_from_env() -> Option<Self> {
        std::env::var("STATS_API_SECONDARY_URL")
            .ok()
            .map(|_| Self::from_env_var("STATS_API_SECONDARY_URL"))
    }

    fn from_env_var(url_var: &str) -> Self {
        let defaults = Self::default();

        let base_url = std::env::var(url_var)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        let league = std::env::var("STATS_LEAGUE")
            .ok()
            .and_then(|raw| League::parse(&raw))
            .unwrap_or(defaults.league);

        let request_timeout = std::env::var("STATS_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            base_url,
            league,
            request_timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_league(mut self, league: League) -> Self {
        self.league = league;
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            league: League::Nba,
            request_timeout: Duration::from_secs(20),
        }
    }
}
