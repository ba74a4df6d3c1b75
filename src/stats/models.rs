use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::provider::{EventRef, PlayPosition, Season};

/// One game's value for the tracked statistic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameStatObservation {
    pub date: NaiveDate,
    pub event_ref: EventRef,
    pub value: u32,
}

/// Highest value of a statistic over a season and every game that reached it.
///
/// `value` is `None` exactly when `observations` is empty (no valid game).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonExtremum {
    pub value: Option<u32>,
    pub observations: Vec<GameStatObservation>,
}

impl SeasonExtremum {
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn is_tie(&self) -> bool {
        self.observations.len() > 1
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.observations.iter().map(|o| o.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub length: u32,
    /// First play of the run
    pub start: PlayPosition,
    /// Last play of the run
    pub end: PlayPosition,
    /// The break play that closed the run; `None` when the season ended first
    pub broken_by: Option<PlayPosition>,
}

/// Non-fatal problems met while scanning; the scan carried on without the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanWarning {
    FetchFailed {
        event_ref: EventRef,
        error: String,
        transient: bool,
    },
    MalformedPlays {
        event_ref: EventRef,
        skipped: usize,
    },
    NoValidValue {
        event_ref: EventRef,
    },
    SeasonUnavailable {
        season: Season,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonStreaks {
    pub season: Season,
    /// In the order the streaks ended
    pub streaks: Vec<Streak>,
    pub warnings: Vec<ScanWarning>,
}

impl SeasonStreaks {
    pub fn empty(season: Season) -> Self {
        Self {
            season,
            streaks: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Longest streak; ties go to the one that started first
    pub fn longest(&self) -> Option<&Streak> {
        self.streaks.iter().fold(None, |best: Option<&Streak>, streak| match best {
            Some(current) if current.length >= streak.length => Some(current),
            _ => Some(streak),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonExtremumReport {
    pub season: Season,
    pub extremum: SeasonExtremum,
    pub warnings: Vec<ScanWarning>,
}

/// Games at or above a minimum, in game log order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonThresholdReport {
    pub season: Season,
    pub minimum: u32,
    pub games: Vec<GameStatObservation>,
    pub warnings: Vec<ScanWarning>,
}

/// Per-season extremum over a range. Seasons without data are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtremaReport {
    pub extrema: BTreeMap<Season, SeasonExtremum>,
    pub warnings: Vec<ScanWarning>,
}

/// Inclusive season bounds; an absent bound is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRange {
    pub start: Option<Season>,
    pub end: Option<Season>,
}

impl SeasonRange {
    pub fn new(start: Option<Season>, end: Option<Season>) -> Self {
        Self { start, end }
    }

    pub fn between(start: Season, end: Season) -> Self {
        Self::new(Some(start), Some(end))
    }

    pub fn contains(&self, season: Season) -> bool {
        self.start.map_or(true, |start| season >= start)
            && self.end.map_or(true, |end| season <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Match,
    Mismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportedBy {
    Both,
    PrimaryOnly,
    SecondaryOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationEntry {
    pub season: Season,
    pub date: NaiveDate,
    pub status: MatchStatus,
    pub value: u32,
    pub reported_by: ReportedBy,
}

/// A season only one provider has a result for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingSeason {
    pub season: Season,
    pub reported_by: ReportedBy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub entries: Vec<ReconciliationEntry>,
    pub missing_seasons: Vec<MissingSeason>,
    pub warnings: Vec<ScanWarning>,
}

/// Points scored by the player in each regulation period of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPeriodPoints {
    pub event_ref: EventRef,
    pub periods: [u32; 4],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodHigh {
    pub event_ref: EventRef,
    pub period: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodExtremum {
    pub value: Option<u32>,
    pub tied: Vec<PeriodHigh>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonPeriodScoring {
    pub season: Season,
    pub events: Vec<EventPeriodPoints>,
    pub best: PeriodExtremum,
    pub warnings: Vec<ScanWarning>,
}
