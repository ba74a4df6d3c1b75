// Library crate for the stat highlights engine
// This file exposes the public API for the server binary and integration tests

pub mod api;
pub mod provider;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use provider::{
    EventCatalog, EventRef, GameLogEntry, InMemoryProvider, PlayEventType, PlayPage, PlayRecord,
    PlayStream, ProviderError, Season,
};
pub use shared::{AppError, AppState};
pub use stats::{
    AnalysisConfig, GapPolicy, SeasonRange, StatKind, StatsError, StatsService, StreakRules,
};
