use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    EventCatalog, EventRef, GameLogEntry, PlayPage, PlayRecord, PlayStream, ProviderError, Season,
};

/// Fixture-backed provider. Used by tests and for offline runs.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    game_logs: Arc<RwLock<HashMap<String, BTreeMap<Season, Vec<GameLogEntry>>>>>,
    plays: Arc<RwLock<HashMap<EventRef, PlayPage>>>,
    failures: Arc<RwLock<HashMap<EventRef, ProviderError>>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_game(&self, player_id: &str, season: Season, entry: GameLogEntry) {
        let mut logs = self.game_logs.write().await;
        logs.entry(player_id.to_string())
            .or_default()
            .entry(season)
            .or_default()
            .push(entry);
    }

    pub async fn add_plays(&self, event_ref: EventRef, plays: Vec<PlayRecord>) {
        self.plays
            .write()
            .await
            .insert(event_ref, PlayPage::new(plays));
    }

    pub async fn add_page(&self, event_ref: EventRef, page: PlayPage) {
        self.plays.write().await.insert(event_ref, page);
    }

    /// Makes every fetch of `event_ref` fail with `error`
    pub async fn fail_event(&self, event_ref: EventRef, error: ProviderError) {
        self.failures.write().await.insert(event_ref, error);
    }
}

#[async_trait]
impl EventCatalog for InMemoryProvider {
    async fn list_seasons(&self, player_id: &str) -> Result<Vec<Season>, ProviderError> {
        let logs = self.game_logs.read().await;
        Ok(logs
            .get(player_id)
            .map(|seasons| seasons.keys().copied().collect())
            .unwrap_or_default())
    }

    async fn game_log(
        &self,
        player_id: &str,
        season: Season,
    ) -> Result<Vec<GameLogEntry>, ProviderError> {
        let logs = self.game_logs.read().await;
        match logs.get(player_id).and_then(|seasons| seasons.get(&season)) {
            Some(entries) if !entries.is_empty() => Ok(entries.clone()),
            _ => Err(ProviderError::NoSuchSeason {
                player_id: player_id.to_string(),
                season,
            }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "InMemoryProvider"
    }
}

#[async_trait]
impl PlayStream for InMemoryProvider {
    async fn get_plays(&self, event_ref: &EventRef) -> Result<PlayPage, ProviderError> {
        if let Some(error) = self.failures.read().await.get(event_ref) {
            return Err(error.clone());
        }

        self.plays
            .read()
            .await
            .get(event_ref)
            .cloned()
            .ok_or_else(|| ProviderError::unavailable(format!("no plays for event {}", event_ref)))
    }
}
