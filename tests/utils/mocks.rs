use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use stat_highlights::{
    EventCatalog, EventRef, GameLogEntry, InMemoryProvider, PlayPage, PlayStream, ProviderError,
    Season,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Play stream that answers from an in-memory provider after a per-event delay
#[derive(Clone)]
pub struct DelayedPlayStream {
    inner: InMemoryProvider,
    delays: Arc<RwLock<HashMap<EventRef, Duration>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl DelayedPlayStream {
    pub fn new(inner: InMemoryProvider) -> Self {
        Self {
            inner,
            delays: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn delay(&self, event: &str, delay: Duration) {
        self.delays
            .write()
            .await
            .insert(EventRef::from(event), delay);
    }

    /// Highest number of fetches observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlayStream for DelayedPlayStream {
    async fn get_plays(&self, event_ref: &EventRef) -> Result<PlayPage, ProviderError> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = self.delays.read().await.get(event_ref).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let result = self.inner.get_plays(event_ref).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Catalog whose game logs fail, or never answer, for chosen seasons
#[derive(Clone)]
pub struct FlakyCatalog {
    inner: InMemoryProvider,
    failing: HashSet<Season>,
    hanging: HashSet<Season>,
}

impl FlakyCatalog {
    pub fn new(inner: InMemoryProvider) -> Self {
        Self {
            inner,
            failing: HashSet::new(),
            hanging: HashSet::new(),
        }
    }

    pub fn fail_season(mut self, season: Season) -> Self {
        self.failing.insert(season);
        self
    }

    /// The season's game log request stalls for an hour
    pub fn hang_season(mut self, season: Season) -> Self {
        self.hanging.insert(season);
        self
    }
}

#[async_trait]
impl EventCatalog for FlakyCatalog {
    async fn list_seasons(&self, player_id: &str) -> Result<Vec<Season>, ProviderError> {
        let mut seasons = self.inner.list_seasons(player_id).await?;
        seasons.extend(self.failing.iter().copied());
        seasons.extend(self.hanging.iter().copied());
        Ok(seasons)
    }

    async fn game_log(
        &self,
        player_id: &str,
        season: Season,
    ) -> Result<Vec<GameLogEntry>, ProviderError> {
        if self.failing.contains(&season) {
            return Err(ProviderError::unavailable("503 Service Unavailable"));
        }
        if self.hanging.contains(&season) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        self.inner.game_log(player_id, season).await
    }

    fn provider_name(&self) -> &'static str {
        "FlakyCatalog"
    }
}
