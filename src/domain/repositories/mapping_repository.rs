//! Repository trait for durable URL mappings.

use crate::domain::entities::UrlMapping;
use crate::error::AppError;
use async_trait::async_trait;

/// Durable store of short code → long URL mappings.
///
/// Cross-request invariants live here rather than in application code: the
/// services never lock, they rely on the atomicity contracts below.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`] - in-process fake
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Looks up the short code already assigned to `long_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn find_short_code_by_long_url(&self, long_url: &str)
    -> Result<Option<String>, AppError>;

    /// Inserts a mapping unless the short code or the long URL is already taken.
    ///
    /// Safe under concurrent calls racing with the same long URL: at most one
    /// of them returns `Ok(true)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn insert_if_absent(&self, short_code: &str, long_url: &str) -> Result<bool, AppError>;

    /// Increments the click counter and returns the long URL in one atomic step.
    ///
    /// Returns `Ok(None)` for unknown codes; nothing is incremented in that case.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn increment_and_fetch(&self, short_code: &str) -> Result<Option<String>, AppError>;

    /// Adds a batch of clicks accumulated in the fast store.
    ///
    /// Returns `Ok(false)` if no mapping exists for the code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn apply_batched_increment(&self, short_code: &str, delta: i64)
    -> Result<bool, AppError>;

    /// Loads the full mapping, including the durable click count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] on database errors.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}
