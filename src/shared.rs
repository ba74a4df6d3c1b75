use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::provider::ProviderError;
use crate::stats::{StatsError, StatsService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub primary: Arc<StatsService>,
    /// Second provider, only needed for reconciliation
    pub secondary: Option<Arc<StatsService>>,
}

impl AppState {
    pub fn new(primary: Arc<StatsService>, secondary: Option<Arc<StatsService>>) -> Self {
        Self { primary, secondary }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream provider error: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Upstream provider error: {}", msg),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::UnknownStatKey(_) | StatsError::Validation(_) => {
                AppError::BadRequest(err.to_string())
            }
            StatsError::Provider(ProviderError::NoSuchSeason { .. }) => {
                AppError::NotFound(err.to_string())
            }
            StatsError::Provider(provider) => AppError::Upstream(provider.to_string()),
            StatsError::Cancelled => {
                error!("Analysis cancelled while serving a request");
                AppError::Internal
            }
        }
    }
}
