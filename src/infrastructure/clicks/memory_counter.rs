//! In-process pending click counters.

use super::service::ClickCounter;
use crate::infrastructure::cache::CacheResult;
use async_trait::async_trait;
use dashmap::DashMap;

/// DashMap-backed click counters.
///
/// Increments and `take` both go through the shard lock of the key, which
/// makes read-and-clear atomic with respect to concurrent increments.
/// Counters are lost on restart, so this is only suitable for single-node
/// development setups and tests.
#[derive(Debug, Default)]
pub struct MemoryClickCounter {
    counters: DashMap<String, i64>,
}

impl MemoryClickCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClickCounter for MemoryClickCounter {
    async fn increment(&self, short_code: &str) -> CacheResult<i64> {
        let mut counter = self.counters.entry(short_code.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn restore(&self, short_code: &str, delta: i64) -> CacheResult<()> {
        *self.counters.entry(short_code.to_string()).or_insert(0) += delta;
        Ok(())
    }

    async fn pending_codes(&self) -> CacheResult<Vec<String>> {
        Ok(self
            .counters
            .iter()
            .map(|entry| entry.key().clone())
            .collect())
    }

    async fn take(&self, short_code: &str) -> CacheResult<Option<i64>> {
        Ok(self.counters.remove(short_code).map(|(_, count)| count))
    }

    async fn peek(&self, short_code: &str) -> CacheResult<i64> {
        Ok(self.counters.get(short_code).map(|c| *c).unwrap_or(0))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_increment_and_take() {
        let counter = MemoryClickCounter::new();

        assert_eq!(counter.increment("abc").await.unwrap(), 1);
        assert_eq!(counter.increment("abc").await.unwrap(), 2);
        assert_eq!(counter.peek("abc").await.unwrap(), 2);

        assert_eq!(counter.take("abc").await.unwrap(), Some(2));
        assert_eq!(counter.take("abc").await.unwrap(), None);
        assert_eq!(counter.peek("abc").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_pending_codes() {
        let counter = MemoryClickCounter::new();
        counter.increment("a").await.unwrap();
        counter.increment("b").await.unwrap();
        counter.increment("b").await.unwrap();

        let mut codes = counter.pending_codes().await.unwrap();
        codes.sort();
        assert_eq!(codes, vec!["a".to_string(), "b".to_string()]);

        counter.take("a").await.unwrap();
        assert_eq!(counter.pending_codes().await.unwrap(), vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_restore_adds_to_new_increments() {
        let counter = MemoryClickCounter::new();
        counter.increment("abc").await.unwrap();
        let taken = counter.take("abc").await.unwrap().unwrap();

        counter.increment("abc").await.unwrap();
        counter.restore("abc", taken).await.unwrap();

        assert_eq!(counter.peek("abc").await.unwrap(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost_across_takes() {
        let counter = Arc::new(MemoryClickCounter::new());

        let writers: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                tokio::spawn(async move {
                    for _ in 0..250 {
                        counter.increment("hot").await.unwrap();
                    }
                })
            })
            .collect();

        let mut drained = 0;
        for _ in 0..20 {
            drained += counter.take("hot").await.unwrap().unwrap_or(0);
            tokio::task::yield_now().await;
        }

        for writer in writers {
            writer.await.unwrap();
        }
        drained += counter.take("hot").await.unwrap().unwrap_or(0);

        assert_eq!(drained, 2_000);
    }
}
