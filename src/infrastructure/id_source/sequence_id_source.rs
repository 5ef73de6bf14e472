//! In-process identifier sequence.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::SnowflakeId;
use crate::domain::repositories::IdSource;
use crate::error::AppError;

/// Monotonic counter implementing [`IdSource`].
///
/// Unique only within one process; used by tests and local tooling.
#[derive(Debug)]
pub struct SequenceIdSource {
    next: AtomicI64,
}

impl SequenceIdSource {
    /// Creates a sequence whose first identifier is `start`.
    pub fn starting_at(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }
}

impl Default for SequenceIdSource {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

#[async_trait]
impl IdSource for SequenceIdSource {
    async fn next_id(&self) -> Result<SnowflakeId, AppError> {
        Ok(SnowflakeId {
            id: self.next.fetch_add(1, Ordering::Relaxed),
            node_id: 0,
            host: "local".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequence_increments() {
        let source = SequenceIdSource::starting_at(653436189499457547);

        assert_eq!(source.next_id().await.unwrap().id, 653436189499457547);
        assert_eq!(source.next_id().await.unwrap().id, 653436189499457548);
    }
}
