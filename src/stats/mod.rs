pub mod extractors;
pub mod extremum;
pub mod periods;
pub mod pipeline;
pub mod reconcile;
pub mod service;
pub mod streak;

mod config;
mod errors;
pub mod models;

pub use config::{AnalysisConfig, GapPolicy};
pub use errors::StatsError;
pub use extractors::{Extractor, ExtractorRegistry, StatKind};
pub use extremum::{find_extremum, games_at_or_above, ExtremumFinder};
pub use models::*;
pub use periods::{highest_period, period_points};
pub use pipeline::{FetchedPage, PlayFeed};
pub use reconcile::{missing_seasons, reconcile};
pub use service::{StatsService, StatsServiceBuilder};
pub use streak::{scan_season, StreakRules, StreakScan, StreakState};
