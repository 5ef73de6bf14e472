//! In-process cache with sliding expiration.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Number of entries above which `set_url` sweeps expired entries.
const PURGE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone)]
struct Entry {
    long_url: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// DashMap-backed cache used when Redis is not configured, and in tests.
///
/// Expiry is measured with [`tokio::time::Instant`], so tests running on a
/// paused clock can move time forward deterministically.
#[derive(Debug)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
    ttl: Duration,
}

impl MemoryCache {
    /// Creates an empty cache whose entries live for `ttl` after their last access.
    pub fn new(ttl: Duration) -> Self {
        debug!("Using in-process cache (TTL: {:?})", ttl);
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Time left before `short_code` expires, if it is cached and live.
    pub fn remaining_ttl(&self, short_code: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .get(short_code)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.expires_at - now)
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();

        let Some(mut entry) = self.entries.get_mut(short_code) else {
            debug!("Cache MISS: {}", short_code);
            return Ok(None);
        };

        if entry.is_expired(now) {
            drop(entry);
            self.entries
                .remove_if(short_code, |_, entry| entry.is_expired(now));
            debug!("Cache MISS (expired): {}", short_code);
            return Ok(None);
        }

        entry.expires_at = now + self.ttl;
        debug!("Cache HIT: {}", short_code);
        Ok(Some(entry.long_url.clone()))
    }

    async fn set_url(&self, short_code: &str, long_url: &str) -> CacheResult<()> {
        if self.entries.len() >= PURGE_THRESHOLD {
            let purged = self.purge_expired();
            debug!("Purged {} expired cache entries", purged);
        }

        self.entries.insert(
            short_code.to_string(),
            Entry {
                long_url: long_url.to_string(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        debug!("Cache SET: {} -> {} (TTL: {:?})", short_code, long_url, self.ttl);
        Ok(())
    }

    async fn evict(&self, short_code: &str) -> CacheResult<()> {
        if self.entries.remove(short_code).is_some() {
            debug!("Cache EVICT: {}", short_code);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
