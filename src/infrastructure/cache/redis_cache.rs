//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info};

/// Namespace of cached mappings: `url:{shortCode}` → long URL.
const KEY_PREFIX: &str = "url:";

/// Builds the Redis key for a cached mapping.
pub fn cache_key(short_code: &str) -> String {
    format!("{KEY_PREFIX}{short_code}")
}

/// Opens a multiplexed, auto-reconnecting Redis connection and checks it with a PING.
///
/// The returned manager is cheap to clone and is shared by the cache and the
/// click counter.
///
/// # Errors
///
/// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection
/// cannot be established, or the PING fails.
pub async fn connect(redis_url: &str) -> CacheResult<ConnectionManager> {
    info!("Connecting to Redis");

    let client = Client::open(redis_url).map_err(|e| {
        CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
    })?;

    let manager = ConnectionManager::new(client).await.map_err(|e| {
        CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
    })?;

    let mut test_conn = manager.clone();
    let _: String = redis::cmd("PING")
        .query_async(&mut test_conn)
        .await
        .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

    info!("✓ Connected to Redis");
    Ok(manager)
}

/// Redis cache for fast URL lookups with sliding expiration.
///
/// Hits use `GETEX ... EX ttl` so reading and refreshing the TTL is one
/// atomic command. Errors are returned to the caller, which treats them as
/// misses.
pub struct RedisCache {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisCache {
    /// Wraps an existing connection; every write and hit applies `ttl`.
    pub fn new(conn: ConnectionManager, ttl: Duration) -> Self {
        Self {
            conn,
            ttl_seconds: ttl.as_secs().max(1),
        }
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        let key = cache_key(short_code);
        let mut conn = self.conn.clone();

        let cached: Option<String> = redis::cmd("GETEX")
            .arg(&key)
            .arg("EX")
            .arg(self.ttl_seconds)
            .query_async(&mut conn)
            .await?;

        match &cached {
            Some(url) => debug!("Cache HIT: {} -> {}", short_code, url),
            None => debug!("Cache MISS: {}", short_code),
        }

        Ok(cached)
    }

    async fn set_url(&self, short_code: &str, long_url: &str) -> CacheResult<()> {
        let key = cache_key(short_code);
        let mut conn = self.conn.clone();

        let _: () = redis::cmd("SET")
            .arg(&key)
            .arg(long_url)
            .arg("EX")
            .arg(self.ttl_seconds)
            .query_async(&mut conn)
            .await?;

        debug!(
            "Cache SET: {} -> {} (TTL: {}s)",
            short_code, long_url, self.ttl_seconds
        );
        Ok(())
    }

    async fn evict(&self, short_code: &str) -> CacheResult<()> {
        let key = cache_key(short_code);
        let mut conn = self.conn.clone();

        let deleted: i64 = redis::cmd("DEL").arg(&key).query_async(&mut conn).await?;
        if deleted > 0 {
            debug!("Cache EVICT: {}", short_code);
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }
}
