use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumString;

/// Starting year of a season; the 2023 season runs "2023 - 2024".
pub type Season = u16;

pub fn season_label(season: Season) -> String {
    format!("{} - {}", season, u32::from(season) + 1)
}

/// Opaque provider identifier for a single game
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRef(pub String);

impl EventRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for EventRef {
    fn from(id: u64) -> Self {
        Self::new(id.to_string())
    }
}

/// Kind of a recorded play, keyed by the provider's `playEventId`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PlayEventType {
    FreeThrowMade,
    FreeThrowMissed,
    FieldGoalMade,
    FieldGoalMissed,
    ThreePointerMade,
    ThreePointerMissed,
    #[strum(disabled)]
    Other(u32),
}

impl PlayEventType {
    pub fn from_id(id: u32) -> Self {
        match id {
            1 => PlayEventType::FreeThrowMade,
            2 => PlayEventType::FreeThrowMissed,
            3 => PlayEventType::FieldGoalMade,
            4 => PlayEventType::FieldGoalMissed,
            5 => PlayEventType::ThreePointerMade,
            6 => PlayEventType::ThreePointerMissed,
            other => PlayEventType::Other(other),
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            PlayEventType::FreeThrowMade => 1,
            PlayEventType::FreeThrowMissed => 2,
            PlayEventType::FieldGoalMade => 3,
            PlayEventType::FieldGoalMissed => 4,
            PlayEventType::ThreePointerMade => 5,
            PlayEventType::ThreePointerMissed => 6,
            PlayEventType::Other(id) => *id,
        }
    }

    pub fn label(&self) -> String {
        match self {
            PlayEventType::FreeThrowMade => "Free Throws Made".to_string(),
            PlayEventType::FreeThrowMissed => "Free Throws Missed".to_string(),
            PlayEventType::FieldGoalMade => "Field Goals Made".to_string(),
            PlayEventType::FieldGoalMissed => "Field Goals Missed".to_string(),
            PlayEventType::ThreePointerMade => "Three Pointers Made".to_string(),
            PlayEventType::ThreePointerMissed => "Three Pointers Missed".to_string(),
            PlayEventType::Other(id) => format!("Play Event {}", id),
        }
    }
}

/// Location of a play inside a season: the game plus its sequence id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayPosition {
    pub event_ref: EventRef,
    pub sequence_id: u64,
}

impl PlayPosition {
    pub fn new(event_ref: EventRef, sequence_id: u64) -> Self {
        Self {
            event_ref,
            sequence_id,
        }
    }
}

impl fmt::Display for PlayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event {}, Play {}", self.event_ref, self.sequence_id)
    }
}

/// One discrete action within a game. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub event_ref: EventRef,
    pub sequence_id: u64,
    pub acting_player_id: String,
    pub play_event_type: PlayEventType,
    pub period_number: Option<u8>,
    pub stat_value: Option<u32>,
}

impl PlayRecord {
    pub fn position(&self) -> PlayPosition {
        PlayPosition::new(self.event_ref.clone(), self.sequence_id)
    }
}

/// Raw box score row for one game from the season index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLogEntry {
    pub event_ref: EventRef,
    pub date: Option<NaiveDate>,
    pub player_stats: serde_json::Value,
}
