//! Top-level router.
//!
//! # Route Structure
//!
//! - `GET  /health`                           - Backend health (public)
//! - `POST /api/v1/tinyurl/shorten`           - Shorten a long URL
//! - `GET  /api/v1/tinyurl/{shortCode}`       - Resolve a short code
//! - `GET  /api/v1/tinyurl/{shortCode}/stats` - Click statistics
//!
//! Requests are traced and trailing slashes are trimmed before routing.

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Base path of the short URL API.
pub const API_PREFIX: &str = "/api/v1/tinyurl";

/// Routes with state and tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest(API_PREFIX, api::routes::tinyurl_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// The service as served: [`router`] behind trailing-slash normalization.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
