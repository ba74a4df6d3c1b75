use serde::{Deserialize, Serialize};

use crate::provider::{season_label, PlayEventType, Season};
use crate::stats::{
    GameStatObservation, ReconciliationReport, ScanWarning, SeasonExtremum, SeasonStreaks,
    SeasonThresholdReport, StatKind, Streak, StreakRules,
};

#[derive(Debug, Deserialize)]
pub struct ExtremumQuery {
    pub stat: String,
    pub start: Option<Season>,
    pub end: Option<Season>,
}

#[derive(Debug, Deserialize)]
pub struct ThresholdQuery {
    pub stat: String,
    pub season: Season,
    pub minimum: u32,
}

/// Play and break types accept either the kebab-case name
/// (`free-throw-made`) or the provider's numeric play event id
#[derive(Debug, Deserialize)]
pub struct StreakQuery {
    pub season: Season,
    pub play: String,
    #[serde(rename = "break")]
    pub break_type: String,
    pub threshold: u32,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub season: Season,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileQuery {
    pub stat: String,
    pub start: Option<Season>,
    pub end: Option<Season>,
    /// Player id under the secondary provider; defaults to the path id
    pub secondary_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub primary: String,
    pub secondary: Option<String>,
}

/// One season's high, labelled for display
#[derive(Debug, Serialize, Deserialize)]
pub struct SeasonHighView {
    pub season: Season,
    pub season_label: String,
    pub value: Option<u32>,
    pub tie: bool,
    pub games: Vec<GameStatObservation>,
}

impl SeasonHighView {
    pub fn new(season: Season, extremum: SeasonExtremum) -> Self {
        Self {
            season,
            season_label: season_label(season),
            value: extremum.value,
            tie: extremum.is_tie(),
            games: extremum.observations,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtremumResponse {
    pub player_id: String,
    pub stat: StatKind,
    pub label: String,
    pub seasons: Vec<SeasonHighView>,
    pub warnings: Vec<ScanWarning>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThresholdResponse {
    pub player_id: String,
    pub stat: StatKind,
    pub season_label: String,
    #[serde(flatten)]
    pub report: SeasonThresholdReport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreakResponse {
    pub player_id: String,
    pub season: Season,
    pub season_label: String,
    pub play_type: PlayEventType,
    pub break_type: PlayEventType,
    pub threshold: u32,
    pub longest: Option<Streak>,
    pub streaks: Vec<Streak>,
    pub warnings: Vec<ScanWarning>,
}

impl StreakResponse {
    pub fn new(rules: &StreakRules, result: SeasonStreaks) -> Self {
        Self {
            player_id: rules.player_id.clone(),
            season: result.season,
            season_label: season_label(result.season),
            play_type: rules.play_type,
            break_type: rules.break_type,
            threshold: rules.threshold,
            longest: result.longest().cloned(),
            streaks: result.streaks,
            warnings: result.warnings,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReconcileResponse {
    pub primary_id: String,
    pub secondary_id: String,
    pub stat: StatKind,
    #[serde(flatten)]
    pub report: ReconciliationReport,
}
