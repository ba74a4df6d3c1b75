use chrono::NaiveDate;
use serde_json::{json, Value};

use stat_highlights::{
    EventRef, GameLogEntry, InMemoryProvider, PlayEventType, PlayPage, PlayRecord, ProviderError,
    Season,
};

// ============================================================================
// Play Script Helpers
// ============================================================================

/// Builds a game's plays from a compact script, one character per play:
///
/// - `M` free throw made by the player
/// - `x` free throw missed by the player
/// - `f` field goal made by the player (neither play nor break type)
/// - `o` free throw missed by someone else
pub fn script(event: &str, player_id: &str, plays: &str) -> Vec<PlayRecord> {
    plays
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let (actor, kind, points) = match c {
                'M' => (player_id, PlayEventType::FreeThrowMade, 1),
                'x' => (player_id, PlayEventType::FreeThrowMissed, 0),
                'f' => (player_id, PlayEventType::FieldGoalMade, 2),
                'o' => ("someone-else", PlayEventType::FreeThrowMissed, 0),
                other => panic!("unknown play script character: {}", other),
            };
            PlayRecord {
                event_ref: EventRef::from(event),
                sequence_id: i as u64 + 1,
                acting_player_id: actor.to_string(),
                play_event_type: kind,
                period_number: Some(1 + (i / 4) as u8 % 4),
                stat_value: Some(points),
            }
        })
        .collect()
}

pub fn date(season: Season, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(i32::from(season), 11, day).unwrap()
}

// ============================================================================
// Season Setup Utilities
// ============================================================================

enum GamePlays {
    Page(PlayPage),
    Failure(ProviderError),
    Missing,
}

/// Accumulates one player's season into an in-memory provider
pub struct SeasonBuilder {
    player_id: String,
    season: Season,
    games: Vec<(GameLogEntry, GamePlays)>,
}

impl SeasonBuilder {
    pub fn new(player_id: &str, season: Season) -> Self {
        Self {
            player_id: player_id.to_string(),
            season,
            games: vec![],
        }
    }

    /// A game with only a box score line
    pub fn box_score(mut self, event: &str, day: u32, player_stats: Value) -> Self {
        self.games.push((
            GameLogEntry {
                event_ref: EventRef::from(event),
                date: Some(date(self.season, day)),
                player_stats,
            },
            GamePlays::Missing,
        ));
        self
    }

    pub fn points(self, event: &str, day: u32, points: u32) -> Self {
        self.box_score(event, day, json!({ "points": points }))
    }

    /// A game whose play-by-play follows `plays` (see [`script`])
    pub fn plays(mut self, event: &str, day: u32, plays: &str) -> Self {
        let records = script(event, &self.player_id, plays);
        self = self.points(event, day, 0);
        if let Some(last) = self.games.last_mut() {
            last.1 = GamePlays::Page(PlayPage::new(records));
        }
        self
    }

    /// Like [`SeasonBuilder::plays`], with `malformed` records reported as dropped
    pub fn plays_with_malformed(
        mut self,
        event: &str,
        day: u32,
        plays: &str,
        malformed: usize,
    ) -> Self {
        self = self.plays(event, day, plays);
        if let Some((_, GamePlays::Page(page))) = self.games.last_mut() {
            page.malformed = malformed;
        }
        self
    }

    /// A game in the log whose play-by-play cannot be fetched
    pub fn failing(mut self, event: &str, day: u32, error: ProviderError) -> Self {
        self = self.points(event, day, 0);
        if let Some(last) = self.games.last_mut() {
            last.1 = GamePlays::Failure(error);
        }
        self
    }

    pub async fn build_into(self, provider: &InMemoryProvider) {
        for (entry, plays) in self.games {
            let event_ref = entry.event_ref.clone();
            provider.add_game(&self.player_id, self.season, entry).await;
            match plays {
                GamePlays::Page(page) => provider.add_page(event_ref, page).await,
                GamePlays::Failure(error) => provider.fail_event(event_ref, error).await,
                GamePlays::Missing => {}
            }
        }
    }

    pub async fn build(self) -> InMemoryProvider {
        let provider = InMemoryProvider::new();
        self.build_into(&provider).await;
        provider
    }
}
