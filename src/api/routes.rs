//! API route configuration.

use crate::api::handlers::{resolve_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short URL routes, nested under `/api/v1/tinyurl`.
///
/// # Endpoints
///
/// - `POST /shorten`             - Create or look up the short code for a URL
/// - `GET  /{shortCode}`         - Resolve a short code and count the click
/// - `GET  /{shortCode}/stats`   - Durable, pending and total clicks
pub fn tinyurl_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/{short_code}", get(resolve_handler))
        .route("/{short_code}/stats", get(stats_handler))
}
