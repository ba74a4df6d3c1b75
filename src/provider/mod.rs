// Collaborator seams for external sports-data providers
//
// The analysis engine only ever sees these two traits. Concrete adapters
// (the stats API over HTTP, the in-memory fixture store) live alongside.

pub use config::{League, ProviderConfig};
pub use errors::ProviderError;
pub use in_memory::InMemoryProvider;
pub use models::*;
pub use stats_api::StatsApiProvider;

mod config;
mod errors;
mod in_memory;
pub mod models;
mod stats_api;

use async_trait::async_trait;

/// Plays for one game, in provider order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayPage {
    pub plays: Vec<PlayRecord>,
    /// Records dropped by the adapter for missing required fields
    pub malformed: usize,
}

impl PlayPage {
    pub fn new(plays: Vec<PlayRecord>) -> Self {
        Self {
            plays,
            malformed: 0,
        }
    }
}

/// Season index: which games a player appeared in, and their box scores
#[async_trait]
pub trait EventCatalog: Send + Sync {
    async fn list_seasons(&self, player_id: &str) -> Result<Vec<Season>, ProviderError>;

    /// Chronological game log. An empty season is `NoSuchSeason`, not an empty Vec.
    async fn game_log(
        &self,
        player_id: &str,
        season: Season,
    ) -> Result<Vec<GameLogEntry>, ProviderError>;

    async fn list_events(
        &self,
        player_id: &str,
        season: Season,
    ) -> Result<Vec<EventRef>, ProviderError> {
        let log = self.game_log(player_id, season).await?;
        Ok(log.into_iter().map(|entry| entry.event_ref).collect())
    }

    fn provider_name(&self) -> &'static str;
}

/// Event detail: the play-by-play for a single game
#[async_trait]
pub trait PlayStream: Send + Sync {
    async fn get_plays(&self, event_ref: &EventRef) -> Result<PlayPage, ProviderError>;
}
