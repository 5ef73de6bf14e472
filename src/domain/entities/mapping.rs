//! URL mapping entity: the durable short code → long URL record.

use chrono::{DateTime, Utc};

/// A persisted short code → long URL mapping.
///
/// Mappings are immutable once created except for `click_count`, which only
/// moves through the store's atomic increment or the batched click flush.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub short_code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl UrlMapping {
    /// Creates a mapping with the given counters.
    pub fn new(
        short_code: String,
        long_url: String,
        created_at: DateTime<Utc>,
        click_count: i64,
    ) -> Self {
        Self {
            short_code,
            long_url,
            created_at,
            click_count,
        }
    }
}

/// Click counters for a single code, combining both accounting paths.
///
/// Cache hits are counted in the fast store until the next flush while cache
/// misses increment the durable column directly, so only the sum of both is
/// always correct.
#[derive(Debug, Clone)]
pub struct ClickStats {
    pub mapping: UrlMapping,
    pub pending_clicks: i64,
}

impl ClickStats {
    pub fn durable_clicks(&self) -> i64 {
        self.mapping.click_count
    }

    pub fn total_clicks(&self) -> i64 {
        self.mapping.click_count + self.pending_clicks
    }
}
