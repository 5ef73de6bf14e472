//! Short code resolution.

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use super::click_aggregator::ClickAggregator;
use crate::domain::encoder::is_valid_code;
use crate::domain::entities::ClickStats;
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::timing::timed;

/// Resolves short codes through the cache, falling back to the durable store.
///
/// Clicks are counted on both paths: a cache hit bumps the pending counter,
/// a miss increments the durable counter in the same statement that reads
/// the long URL.
pub struct ResolutionService<R: MappingRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
    clicks: Arc<ClickAggregator<R>>,
}

impl<R: MappingRepository + ?Sized> ResolutionService<R> {
    pub fn new(
        repository: Arc<R>,
        cache: Arc<dyn CacheService>,
        clicks: Arc<ClickAggregator<R>>,
    ) -> Self {
        Self {
            repository,
            cache,
            clicks,
        }
    }

    /// Returns the long URL for `short_code` and counts one click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes, including strings that
    /// could never have been produced by the encoder.
    /// Returns [`AppError::Store`] on database errors.
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        if !is_valid_code(short_code) {
            return Err(not_found(short_code));
        }

        match timed("cache.get_url", self.cache.get_url(short_code)).await {
            Ok(Some(long_url)) => {
                debug!("Cache hit for {}", short_code);
                self.clicks.record_hit(short_code).await;
                return Ok(long_url);
            }
            Ok(None) => debug!("Cache miss for {}", short_code),
            Err(e) => warn!("Cache read failed for {}, using store: {}", short_code, e),
        }

        let long_url = timed(
            "store.increment_and_fetch",
            self.repository.increment_and_fetch(short_code),
        )
        .await?
        .ok_or_else(|| not_found(short_code))?;

        if let Err(e) = self.cache.set_url(short_code, &long_url).await {
            warn!("Failed to cache mapping {}: {}", short_code, e);
        }

        Ok(long_url)
    }

    /// Returns the mapping with its durable and pending click counts.
    ///
    /// Does not count a click. If the pending counter cannot be read it is
    /// reported as zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown codes.
    /// Returns [`AppError::Store`] on database errors.
    pub async fn stats(&self, short_code: &str) -> Result<ClickStats, AppError> {
        if !is_valid_code(short_code) {
            return Err(not_found(short_code));
        }

        let mapping = self
            .repository
            .find_by_short_code(short_code)
            .await?
            .ok_or_else(|| not_found(short_code))?;

        let pending_clicks = self.clicks.pending(short_code).await.unwrap_or_else(|e| {
            warn!("Failed to read pending clicks for {}: {}", short_code, e);
            0
        });

        Ok(ClickStats {
            mapping,
            pending_clicks,
        })
    }
}

fn not_found(short_code: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "shortUrl": short_code }))
}
