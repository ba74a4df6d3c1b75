use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{FetchedPage, GapPolicy, ScanWarning, SeasonStreaks, StatsError, Streak};
use crate::provider::{PlayEventType, PlayPosition, PlayRecord, Season};

/// Run-in-progress state. Owned by exactly one scan and threaded through
/// [`StreakRules::step`] by value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StreakState {
    #[default]
    Idle,
    Running {
        length: u32,
        start: PlayPosition,
        last: PlayPosition,
    },
}

impl StreakState {
    pub fn length(&self) -> u32 {
        match self {
            StreakState::Idle => 0,
            StreakState::Running { length, .. } => *length,
        }
    }
}

/// Which plays extend a run, which end it, and how long it must be to count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRules {
    pub player_id: String,
    pub play_type: PlayEventType,
    pub break_type: PlayEventType,
    pub threshold: u32,
}

impl StreakRules {
    pub fn new(
        player_id: impl Into<String>,
        play_type: PlayEventType,
        break_type: PlayEventType,
        threshold: u32,
    ) -> Result<Self, StatsError> {
        if threshold == 0 {
            return Err(StatsError::validation("streak threshold must be at least 1"));
        }
        if play_type == break_type {
            return Err(StatsError::validation("play type and break type must differ"));
        }
        Ok(Self {
            player_id: player_id.into(),
            play_type,
            break_type,
            threshold,
        })
    }

    /// Advances the state machine by one play. Returns the next state and the
    /// streak closed by this play, if any.
    pub fn step(&self, state: StreakState, play: &PlayRecord) -> (StreakState, Option<Streak>) {
        if play.acting_player_id != self.player_id {
            return (state, None);
        }

        if play.play_event_type == self.play_type {
            let position = play.position();
            let next = match state {
                StreakState::Idle => StreakState::Running {
                    length: 1,
                    start: position.clone(),
                    last: position,
                },
                StreakState::Running { length, start, .. } => StreakState::Running {
                    length: length + 1,
                    start,
                    last: position,
                },
            };
            (next, None)
        } else if play.play_event_type == self.break_type {
            (StreakState::Idle, self.close(state, Some(play.position())))
        } else {
            (state, None)
        }
    }

    /// Steps through a page of plays, carrying `state` in and out
    pub fn scan(&self, state: StreakState, plays: &[PlayRecord]) -> (StreakState, Vec<Streak>) {
        plays
            .iter()
            .fold((state, Vec::new()), |(state, mut streaks), play| {
                let (next, closed) = self.step(state, play);
                streaks.extend(closed);
                (next, streaks)
            })
    }

    /// End of season: a qualifying run still in progress is reported
    pub fn finish(&self, state: StreakState) -> Option<Streak> {
        self.close(state, None)
    }

    fn close(&self, state: StreakState, broken_by: Option<PlayPosition>) -> Option<Streak> {
        match state {
            StreakState::Running {
                length,
                start,
                last,
            } if length >= self.threshold => Some(Streak {
                length,
                start,
                end: last,
                broken_by,
            }),
            _ => None,
        }
    }
}

/// Consumes a season's pages in chronological order. Never resets at game
/// boundaries.
pub struct StreakScan<'a> {
    rules: &'a StreakRules,
    gap_policy: GapPolicy,
    season: Season,
    state: StreakState,
    streaks: Vec<Streak>,
    warnings: Vec<ScanWarning>,
}

impl<'a> StreakScan<'a> {
    pub fn new(rules: &'a StreakRules, gap_policy: GapPolicy, season: Season) -> Self {
        Self {
            rules,
            gap_policy,
            season,
            state: StreakState::Idle,
            streaks: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn apply(&mut self, page: FetchedPage) {
        let FetchedPage { event_ref, result } = page;
        let state = std::mem::take(&mut self.state);

        match result {
            Ok(page) => {
                if page.malformed > 0 {
                    self.warnings.push(ScanWarning::MalformedPlays {
                        event_ref: event_ref.clone(),
                        skipped: page.malformed,
                    });
                }

                let (next, closed) = self.rules.scan(state, &page.plays);
                for streak in &closed {
                    debug!(
                        season = self.season,
                        length = streak.length,
                        start = %streak.start,
                        end = %streak.end,
                        "Streak closed"
                    );
                }
                self.streaks.extend(closed);
                self.state = next;
            }
            Err(error) => {
                warn!(
                    season = self.season,
                    event_ref = %event_ref,
                    error = %error,
                    carried_length = state.length(),
                    gap_policy = ?self.gap_policy,
                    "Event data unavailable, scanning past the gap"
                );
                self.warnings.push(ScanWarning::FetchFailed {
                    event_ref,
                    transient: error.is_transient(),
                    error: error.to_string(),
                });

                self.state = match self.gap_policy {
                    GapPolicy::Optimistic => state,
                    GapPolicy::Conservative => {
                        self.streaks.extend(self.rules.finish(state));
                        StreakState::Idle
                    }
                };
            }
        }
    }

    pub fn finish(mut self) -> SeasonStreaks {
        let state = std::mem::take(&mut self.state);
        self.streaks.extend(self.rules.finish(state));

        SeasonStreaks {
            season: self.season,
            streaks: self.streaks,
            warnings: self.warnings,
        }
    }
}

/// Scans already-fetched pages synchronously, in the order given
pub fn scan_season<I>(
    rules: &StreakRules,
    gap_policy: GapPolicy,
    season: Season,
    pages: I,
) -> SeasonStreaks
where
    I: IntoIterator<Item = FetchedPage>,
{
    let mut scan = StreakScan::new(rules, gap_policy, season);
    for page in pages {
        scan.apply(page);
    }
    scan.finish()
}
