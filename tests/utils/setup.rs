use std::sync::Arc;
use std::time::Duration;

use stat_highlights::{
    AnalysisConfig, EventCatalog, GapPolicy, InMemoryProvider, PlayStream, StatsService,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: StatsService,
}

pub struct TestSetupBuilder {
    provider: InMemoryProvider,
    catalog: Option<Arc<dyn EventCatalog>>,
    plays: Option<Arc<dyn PlayStream>>,
    config: AnalysisConfig,
}

impl TestSetupBuilder {
    pub fn new(provider: InMemoryProvider) -> Self {
        Self {
            provider,
            catalog: None,
            plays: None,
            config: AnalysisConfig::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn EventCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_plays(mut self, plays: Arc<dyn PlayStream>) -> Self {
        self.plays = Some(plays);
        self
    }

    pub fn with_gap_policy(mut self, gap_policy: GapPolicy) -> Self {
        self.config = self.config.with_gap_policy(gap_policy);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_fetch_timeout(timeout);
        self
    }

    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.config = self.config.with_fetch_concurrency(concurrency);
        self
    }

    pub fn build(self) -> TestSetup {
        let shared = Arc::new(self.provider);
        let catalog: Arc<dyn EventCatalog> = match self.catalog {
            Some(catalog) => catalog,
            None => shared.clone(),
        };
        let plays: Arc<dyn PlayStream> = match self.plays {
            Some(plays) => plays,
            None => shared,
        };

        let service = StatsService::builder(catalog, plays)
            .with_config(self.config)
            .build()
            .expect("standard registry should validate");

        TestSetup { service }
    }
}
