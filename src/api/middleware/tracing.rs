//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// Spans are created at `INFO` with method, URI and version. Request start is
/// logged at `DEBUG`, responses at `INFO` with status and latency.
///
/// # Example Logs
///
/// ```text
/// DEBUG request{method=GET uri=/api/v1/tinyurl/mGkAYBHPwp version=HTTP/1.1}: started processing request
/// INFO request{method=GET uri=/api/v1/tinyurl/mGkAYBHPwp version=HTTP/1.1}: finished processing request latency=2 ms status=200
/// ```
///
/// # Integration
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/api/v1/tinyurl", tinyurl_routes())
///     .layer(tracing::layer());
/// ```
pub fn layer()
-> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
