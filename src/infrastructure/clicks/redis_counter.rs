//! Redis-backed pending click counters.

use super::service::ClickCounter;
use crate::infrastructure::cache::CacheResult;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::collections::BTreeSet;
use tracing::debug;

/// Namespace of pending counters: `clicks:{shortCode}` → integer, no TTL.
const KEY_PREFIX: &str = "clicks:";

/// Keys requested per SCAN round trip.
const SCAN_BATCH: usize = 500;

pub fn clicks_key(short_code: &str) -> String {
    format!("{KEY_PREFIX}{short_code}")
}

/// Extracts the short code from a `clicks:{code}` key.
pub fn code_from_clicks_key(key: &str) -> Option<&str> {
    key.strip_prefix(KEY_PREFIX).filter(|code| !code.is_empty())
}

/// Pending click counters stored as plain Redis integers.
///
/// `INCR` on the hot path, `SCAN` for enumeration and `GETDEL` for the
/// atomic read-and-clear used by the flush job.
pub struct RedisClickCounter {
    conn: ConnectionManager,
}

impl RedisClickCounter {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ClickCounter for RedisClickCounter {
    async fn increment(&self, short_code: &str) -> CacheResult<i64> {
        let mut conn = self.conn.clone();
        let count: i64 = redis::cmd("INCR")
            .arg(clicks_key(short_code))
            .query_async(&mut conn)
            .await?;

        debug!("Pending clicks for {}: {}", short_code, count);
        Ok(count)
    }

    async fn restore(&self, short_code: &str, delta: i64) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        let _: i64 = redis::cmd("INCRBY")
            .arg(clicks_key(short_code))
            .arg(delta)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn pending_codes(&self) -> CacheResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let pattern = format!("{KEY_PREFIX}*");
        // SCAN may return a key more than once.
        let mut codes = BTreeSet::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            codes.extend(
                keys.iter()
                    .filter_map(|key| code_from_clicks_key(key))
                    .map(str::to_string),
            );

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(codes.into_iter().collect())
    }

    async fn take(&self, short_code: &str) -> CacheResult<Option<i64>> {
        let mut conn = self.conn.clone();
        let count: Option<i64> = redis::cmd("GETDEL")
            .arg(clicks_key(short_code))
            .query_async(&mut conn)
            .await?;
        Ok(count)
    }

    async fn peek(&self, short_code: &str) -> CacheResult<i64> {
        let mut conn = self.conn.clone();
        let count: Option<i64> = redis::cmd("GET")
            .arg(clicks_key(short_code))
            .query_async(&mut conn)
            .await?;
        Ok(count.unwrap_or(0))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }
}
