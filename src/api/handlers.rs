use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::str::FromStr;
use tracing::{info, instrument};

use super::types::{
    ExtremumQuery, ExtremumResponse, HealthResponse, PeriodQuery, ReconcileQuery,
    ReconcileResponse, SeasonHighView, StreakQuery, StreakResponse, ThresholdQuery,
    ThresholdResponse,
};
use crate::provider::{season_label, PlayEventType};
use crate::shared::{AppError, AppState};
use crate::stats::{SeasonPeriodScoring, SeasonRange, StatKind, StreakRules};

fn parse_play_type(raw: &str) -> Result<PlayEventType, AppError> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<u32>() {
        return Ok(PlayEventType::from_id(id));
    }
    PlayEventType::from_str(raw)
        .map_err(|_| AppError::BadRequest(format!("Unknown play type: {}", raw)))
}

/// HTTP handler for liveness checks
///
/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        primary: state.primary.provider_name().to_string(),
        secondary: state
            .secondary
            .as_ref()
            .map(|s| s.provider_name().to_string()),
    })
}

/// HTTP handler for season highs of one stat
///
/// GET /players/:id/extremum?stat=&start=&end=
/// Returns one entry per season with data, ties included
#[instrument(name = "season_extremum", skip(state))]
pub async fn season_extremum(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Query(query): Query<ExtremumQuery>,
) -> Result<Json<ExtremumResponse>, AppError> {
    let stat = StatKind::parse(&query.stat)?;
    let range = SeasonRange::new(query.start, query.end);

    let report = state
        .primary
        .extremum_by_season(&player_id, range, stat)
        .await?;

    info!(
        player_id = %player_id,
        seasons = report.extrema.len(),
        "Season highs computed"
    );

    Ok(Json(ExtremumResponse {
        player_id,
        stat,
        label: stat.label().to_string(),
        seasons: report
            .extrema
            .into_iter()
            .map(|(season, extremum)| SeasonHighView::new(season, extremum))
            .collect(),
        warnings: report.warnings,
    }))
}

/// HTTP handler for games at or above a minimum
///
/// GET /players/:id/threshold?stat=&season=&minimum=
#[instrument(name = "threshold_games", skip(state))]
pub async fn threshold_games(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Query(query): Query<ThresholdQuery>,
) -> Result<Json<ThresholdResponse>, AppError> {
    let stat = StatKind::parse(&query.stat)?;
    let report = state
        .primary
        .threshold_games(&player_id, query.season, stat, query.minimum)
        .await?;

    Ok(Json(ThresholdResponse {
        player_id,
        stat,
        season_label: season_label(query.season),
        report,
    }))
}

/// HTTP handler for play streaks within a season
///
/// GET /players/:id/streaks?season=&play=&break=&threshold=
/// Returns every qualifying streak plus the longest one
#[instrument(name = "season_streaks", skip(state))]
pub async fn season_streaks(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Query(query): Query<StreakQuery>,
) -> Result<Json<StreakResponse>, AppError> {
    let rules = StreakRules::new(
        player_id,
        parse_play_type(&query.play)?,
        parse_play_type(&query.break_type)?,
        query.threshold,
    )?;

    let result = state
        .primary
        .season_streaks(query.season, &rules, None)
        .await?;

    Ok(Json(StreakResponse::new(&rules, result)))
}

/// HTTP handler for points per regulation period
///
/// GET /players/:id/periods?season=
#[instrument(name = "period_scoring", skip(state))]
pub async fn period_scoring(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<SeasonPeriodScoring>, AppError> {
    let scoring = state
        .primary
        .period_scoring(&player_id, query.season)
        .await?;
    Ok(Json(scoring))
}

/// HTTP handler comparing season highs across the two providers
///
/// GET /players/:id/reconcile?stat=&start=&end=&secondary_id=
#[instrument(name = "reconcile", skip(state))]
pub async fn reconcile(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Query(query): Query<ReconcileQuery>,
) -> Result<Json<ReconcileResponse>, AppError> {
    let secondary = state
        .secondary
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("No secondary provider configured".to_string()))?;

    let stat = StatKind::parse(&query.stat)?;
    let secondary_id = query.secondary_id.unwrap_or_else(|| player_id.clone());
    let range = SeasonRange::new(query.start, query.end);

    let report = state
        .primary
        .reconcile_with(secondary, &player_id, &secondary_id, range, stat)
        .await?;

    Ok(Json(ReconcileResponse {
        primary_id: player_id,
        secondary_id,
        stat,
        report,
    }))
}
