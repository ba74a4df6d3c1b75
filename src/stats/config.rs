use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a failed event fetch does to a run in progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// The missing game is presumed to contain no break; the run carries over
    #[default]
    Optimistic,
    /// The missing game closes the run at the last observed play
    Conservative,
}

impl GapPolicy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Some(GapPolicy::Optimistic),
            "conservative" => Some(GapPolicy::Conservative),
            _ => None,
        }
    }
}

/// Tuning for season scans
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Event detail fetches in flight at once
    pub fetch_concurrency: usize,
    /// Upper bound for one event detail fetch
    pub fetch_timeout: Duration,
    pub gap_policy: GapPolicy,
    /// Fetched pages buffered ahead of the scan
    pub channel_capacity: usize,
}

impl AnalysisConfig {
    /// Reads `FETCH_CONCURRENCY`, `FETCH_TIMEOUT_SECS` and `STREAK_GAP_POLICY`
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let fetch_concurrency = std::env::var("FETCH_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.fetch_concurrency);

        let fetch_timeout = std::env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        let gap_policy = std::env::var("STREAK_GAP_POLICY")
            .ok()
            .and_then(|raw| GapPolicy::parse(&raw))
            .unwrap_or(defaults.gap_policy);

        Self {
            fetch_concurrency,
            fetch_timeout,
            gap_policy,
            channel_capacity: defaults.channel_capacity.max(fetch_concurrency),
        }
    }

    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.gap_policy = gap_policy;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn with_fetch_concurrency(mut self, fetch_concurrency: usize) -> Self {
        self.fetch_concurrency = fetch_concurrency.max(1);
        self
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: 8,
            fetch_timeout: Duration::from_secs(30),
            gap_policy: GapPolicy::Optimistic,
            channel_capacity: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_policy_defaults_to_optimistic() {
        assert_eq!(AnalysisConfig::default().gap_policy, GapPolicy::Optimistic);
        assert_eq!(GapPolicy::parse("Conservative"), Some(GapPolicy::Conservative));
        assert_eq!(GapPolicy::parse("strict"), None);
    }

    #[test]
    fn concurrency_never_drops_to_zero() {
        let config = AnalysisConfig::default().with_fetch_concurrency(0);
        assert_eq!(config.fetch_concurrency, 1);
    }
}
