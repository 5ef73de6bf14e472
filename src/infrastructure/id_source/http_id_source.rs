//! HTTP client for the snowflake identifier service.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::entities::SnowflakeId;
use crate::domain::repositories::IdSource;
use crate::error::AppError;

/// Path of the identifier endpoint, relative to the configured base URL.
const NEXT_ID_PATH: &str = "/api/v1/snowflake/next";

/// Fetches identifiers from `GET {base_url}/api/v1/snowflake/next`.
///
/// The whole request (connect, send, read body) is bounded by the configured
/// timeout. No retries are attempted.
pub struct HttpIdSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpIdSource {
    /// Builds a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), NEXT_ID_PATH),
        })
    }

    /// Full URL that [`IdSource::next_id`] calls.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Maps a transport or decoding failure to [`AppError::UpstreamUnavailable`].
fn upstream_error(e: reqwest::Error) -> AppError {
    let reason = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "unreachable"
    } else if e.is_status() {
        "error status"
    } else if e.is_decode() {
        "invalid body"
    } else {
        "request failed"
    };

    warn!("Identifier service call failed ({}): {}", reason, e);

    AppError::upstream_unavailable(
        "Identifier service temporarily unavailable. Please try again later.",
        json!({ "reason": reason }),
    )
}

#[async_trait]
impl IdSource for HttpIdSource {
    async fn next_id(&self) -> Result<SnowflakeId, AppError> {
        debug!("Getting next id from {}", self.endpoint);

        let id = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(upstream_error)?
            .json::<SnowflakeId>()
            .await
            .map_err(upstream_error)?;

        debug!("Received id {} from node {} ({})", id.id, id.node_id, id.host);
        Ok(id)
    }
}
