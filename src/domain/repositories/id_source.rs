//! Identifier source contract.

use crate::domain::entities::SnowflakeId;
use crate::error::AppError;
use async_trait::async_trait;

/// Yields globally unique, roughly time-ordered 64-bit identifiers.
///
/// Callers must not retry a failed call on their own: a retry that races a
/// slow first attempt can allocate two identifiers for one request.
///
/// # Implementations
///
/// - [`crate::infrastructure::id_source::HttpIdSource`] - snowflake HTTP service
/// - [`crate::infrastructure::id_source::SequenceIdSource`] - in-process counter
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdSource: Send + Sync {
    /// Fetches the next identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UpstreamUnavailable`] on timeout, connection failure
    /// or an unusable response.
    async fn next_id(&self) -> Result<SnowflakeId, AppError>;
}
