//! Pending click counter trait.

use crate::infrastructure::cache::CacheResult;
use async_trait::async_trait;

/// Per-code click counters kept in the fast store between flushes.
///
/// `take` must read and clear a counter in one indivisible step: an increment
/// that lands concurrently is either included in the returned value or left
/// behind in a fresh counter, never lost and never counted twice.
///
/// # Implementations
///
/// - [`crate::infrastructure::clicks::RedisClickCounter`] - `clicks:{code}` keys in Redis
/// - [`crate::infrastructure::clicks::MemoryClickCounter`] - in-process fallback
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickCounter: Send + Sync {
    /// Adds one click and returns the new pending count.
    async fn increment(&self, short_code: &str) -> CacheResult<i64>;

    /// Adds `delta` clicks back, used when a flushed batch could not be applied.
    async fn restore(&self, short_code: &str, delta: i64) -> CacheResult<()>;

    /// Lists codes that currently have a pending counter.
    async fn pending_codes(&self) -> CacheResult<Vec<String>>;

    /// Atomically reads and clears the counter for `short_code`.
    async fn take(&self, short_code: &str) -> CacheResult<Option<i64>>;

    /// Reads the pending count without clearing it.
    async fn peek(&self, short_code: &str) -> CacheResult<i64>;

    /// Checks if the backing store is reachable.
    async fn health_check(&self) -> bool;
}
