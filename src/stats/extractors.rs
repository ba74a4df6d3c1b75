use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{GameStatObservation, StatsError};
use crate::provider::GameLogEntry;

/// Box score statistics that can be tracked per game.
///
/// Parses from the stats API key (`threePointFieldGoals`) or the short
/// box score alias (`fg3`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    #[strum(to_string = "points", serialize = "pts")]
    Points,
    #[strum(to_string = "assists", serialize = "ast")]
    Assists,
    #[strum(to_string = "steals", serialize = "stl")]
    Steals,
    #[strum(to_string = "blockedShots", serialize = "blk")]
    BlockedShots,
    #[strum(to_string = "turnovers", serialize = "tov")]
    Turnovers,
    #[strum(to_string = "personalFouls", serialize = "pf")]
    PersonalFouls,
    #[strum(to_string = "rebounds", serialize = "trb")]
    Rebounds,
    #[strum(to_string = "offensiveRebounds", serialize = "orb")]
    OffensiveRebounds,
    #[strum(to_string = "defensiveRebounds", serialize = "drb")]
    DefensiveRebounds,
    #[strum(to_string = "fieldGoals", serialize = "fg")]
    FieldGoals,
    #[strum(to_string = "fieldGoalsAttempted", serialize = "fga")]
    FieldGoalsAttempted,
    #[strum(to_string = "threePointFieldGoals", serialize = "fg3")]
    ThreePointFieldGoals,
    #[strum(to_string = "threePointFieldGoalsAttempted", serialize = "fg3a")]
    ThreePointFieldGoalsAttempted,
    #[strum(to_string = "freeThrows", serialize = "ft")]
    FreeThrows,
    #[strum(to_string = "freeThrowsAttempted", serialize = "fta")]
    FreeThrowsAttempted,
}

impl StatKind {
    pub fn parse(key: &str) -> Result<Self, StatsError> {
        StatKind::from_str(key.trim()).map_err(|_| StatsError::UnknownStatKey(key.to_string()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatKind::Points => "Points",
            StatKind::Assists => "Assists",
            StatKind::Steals => "Steals",
            StatKind::BlockedShots => "Blocks",
            StatKind::Turnovers => "Turnovers",
            StatKind::PersonalFouls => "Personal Fouls",
            StatKind::Rebounds => "Total Rebounds",
            StatKind::OffensiveRebounds => "Offensive Rebounds",
            StatKind::DefensiveRebounds => "Defensive Rebounds",
            StatKind::FieldGoals => "Field Goals Made",
            StatKind::FieldGoalsAttempted => "Field Goals Attempted",
            StatKind::ThreePointFieldGoals => "Three Point Field Goals Made",
            StatKind::ThreePointFieldGoalsAttempted => "Three Point Field Goals Attempted",
            StatKind::FreeThrows => "Free Throws Made",
            StatKind::FreeThrowsAttempted => "Free Throws Attempted",
        }
    }
}

/// Pulls one statistic out of a game's `playerStats` object
pub type Extractor = fn(&Value) -> Option<u32>;

fn field(stats: &Value, key: &str) -> Option<u32> {
    stats
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

fn nested(stats: &Value, key: &str, sub: &str) -> Option<u32> {
    stats.get(key).and_then(|inner| field(inner, sub))
}

/// Table of extractors keyed by stat kind
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<StatKind, Extractor>,
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Extractors for the stats API box score layout
    pub fn standard() -> Self {
        Self::empty()
            .register(StatKind::Points, |s| field(s, "points"))
            .register(StatKind::Assists, |s| field(s, "assists"))
            .register(StatKind::Steals, |s| field(s, "steals"))
            .register(StatKind::BlockedShots, |s| field(s, "blockedShots"))
            .register(StatKind::Turnovers, |s| field(s, "turnovers"))
            .register(StatKind::PersonalFouls, |s| field(s, "personalFouls"))
            .register(StatKind::Rebounds, |s| nested(s, "rebounds", "total"))
            .register(StatKind::OffensiveRebounds, |s| {
                nested(s, "rebounds", "offensive")
            })
            .register(StatKind::DefensiveRebounds, |s| {
                nested(s, "rebounds", "defensive")
            })
            .register(StatKind::FieldGoals, |s| nested(s, "fieldGoals", "made"))
            .register(StatKind::FieldGoalsAttempted, |s| {
                nested(s, "fieldGoals", "attempted")
            })
            .register(StatKind::ThreePointFieldGoals, |s| {
                nested(s, "threePointFieldGoals", "made")
            })
            .register(StatKind::ThreePointFieldGoalsAttempted, |s| {
                nested(s, "threePointFieldGoals", "attempted")
            })
            .register(StatKind::FreeThrows, |s| nested(s, "freeThrows", "made"))
            .register(StatKind::FreeThrowsAttempted, |s| {
                nested(s, "freeThrows", "attempted")
            })
    }

    pub fn register(mut self, kind: StatKind, extractor: Extractor) -> Self {
        self.extractors.insert(kind, extractor);
        self
    }

    /// Fails when any stat kind has no extractor
    pub fn validate(&self) -> Result<(), StatsError> {
        let missing: Vec<String> = StatKind::iter()
            .filter(|kind| !self.extractors.contains_key(kind))
            .map(|kind| kind.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(StatsError::validation(format!(
                "no extractor registered for: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn extract(&self, kind: StatKind, player_stats: &Value) -> Result<Option<u32>, StatsError> {
        let extractor = self
            .extractors
            .get(&kind)
            .ok_or_else(|| StatsError::UnknownStatKey(kind.to_string()))?;
        Ok(extractor(player_stats))
    }

    /// The observation for one game, or `None` when its date or value is missing
    pub fn observation(
        &self,
        entry: &GameLogEntry,
        kind: StatKind,
    ) -> Result<Option<GameStatObservation>, StatsError> {
        let value = self.extract(kind, &entry.player_stats)?;
        Ok(value.zip(entry.date).map(|(value, date)| GameStatObservation {
            date,
            event_ref: entry.event_ref.clone(),
            value,
        }))
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
