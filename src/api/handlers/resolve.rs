//! Handler for short code resolution.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::resolve::ResolveResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the long URL behind a short code and counts the click.
///
/// # Endpoint
///
/// `GET /api/v1/tinyurl/{shortCode}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn resolve_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ResolveResponse>, AppError> {
    let long_url = state.resolution_service.resolve(&short_code).await?;

    Ok(Json(ResolveResponse { long_url }))
}
