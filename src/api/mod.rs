// Public API - what other modules can use
pub use handlers::{
    health, period_scoring, reconcile, season_extremum, season_streaks, threshold_games,
};

// Internal modules
mod handlers;
pub mod types;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;

/// All HTTP routes, wired to the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/players/:id/extremum", get(season_extremum))
        .route("/players/:id/threshold", get(threshold_games))
        .route("/players/:id/streaks", get(season_streaks))
        .route("/players/:id/periods", get(period_scoring))
        .route("/players/:id/reconcile", get(reconcile))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
