//! DTOs for the click statistics endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ClickStats;

/// Click counters for one short code.
///
/// `durableClicks` lags behind by at most one flush period;
/// `totalClicks` includes the clicks still pending in the fast store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub durable_clicks: i64,
    pub pending_clicks: i64,
    pub total_clicks: i64,
}

impl From<ClickStats> for StatsResponse {
    fn from(stats: ClickStats) -> Self {
        let durable_clicks = stats.durable_clicks();
        let total_clicks = stats.total_clicks();

        Self {
            short_url: stats.mapping.short_code,
            long_url: stats.mapping.long_url,
            created_at: stats.mapping.created_at,
            durable_clicks,
            pending_clicks: stats.pending_clicks,
            total_clicks,
        }
    }
}
