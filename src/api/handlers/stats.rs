//! Handler for per-code click statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns durable, pending and total clicks for a short code.
///
/// # Endpoint
///
/// `GET /api/v1/tinyurl/{shortCode}/stats`
///
/// Reading statistics does not count as a click.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.resolution_service.stats(&short_code).await?;

    Ok(Json(stats.into()))
}
