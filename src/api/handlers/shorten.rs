//! Handler for the shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the short code for a long URL, creating it if needed.
///
/// # Endpoint
///
/// `POST /api/v1/tinyurl/shorten`
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// { "shortUrl": "mGkAYBHPwp" }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: A new mapping was stored
/// - **200 OK**: The URL was already shortened (including by a concurrent request)
/// - **400 Bad Request**: Missing or invalid `longUrl`
/// - **503 Service Unavailable**: Identifier service unavailable, or a
///   concurrent creation could not be resolved (safe to retry)
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let outcome = state.shortening_service.shorten(&payload.long_url).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(ShortenResponse {
            short_url: outcome.short_code,
        }),
    ))
}
