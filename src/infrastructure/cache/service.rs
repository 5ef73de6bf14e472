//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur in the fast store (cache entries and click counters).
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_refusal() || e.is_connection_dropped() || e.is_timeout() {
            Self::ConnectionError(e.to_string())
        } else {
            Self::OperationError(e.to_string())
        }
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Short code → long URL cache with sliding expiration.
///
/// The cache is advisory. A miss never implies the code is unknown, and a hit
/// is trusted without re-validation because mappings never change after
/// creation. Callers treat errors as misses.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed, shared across instances
/// - [`crate::infrastructure::cache::MemoryCache`] - in-process fallback
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached long URL and resets its TTL to the full duration.
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping with the full TTL.
    async fn set_url(&self, short_code: &str, long_url: &str) -> CacheResult<()>;

    /// Removes a cached mapping.
    ///
    /// Only used for administrative correction; mappings are immutable so the
    /// normal request paths never evict.
    async fn evict(&self, short_code: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
