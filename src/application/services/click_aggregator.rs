//! Batched click counting.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheError, CacheResult};
use crate::infrastructure::clicks::ClickCounter;
use crate::utils::timing::timed;

/// Outcome of one flush cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    /// Pending counters found when the cycle started.
    pub keys: usize,
    /// Counters applied to the durable store.
    pub flushed: usize,
    /// Counters that could not be applied.
    pub failed: usize,
    /// Clicks moved into the durable store.
    pub clicks: i64,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.keys == 0
    }
}

enum FlushError {
    Counter(CacheError),
    UnknownCode(i64),
    Store(AppError),
}

/// Accumulates cache-hit clicks in the fast store and drains them into the
/// durable click counters.
///
/// Draining uses read-and-clear per key, so increments that land while a flush
/// runs end up in the next cycle. A batch the durable store rejects is added
/// back to the pending counter, which makes delivery at-least-once.
pub struct ClickAggregator<R: MappingRepository + ?Sized> {
    counter: Arc<dyn ClickCounter>,
    repository: Arc<R>,
    flush_lock: Mutex<()>,
}

impl<R: MappingRepository + ?Sized> ClickAggregator<R> {
    pub fn new(counter: Arc<dyn ClickCounter>, repository: Arc<R>) -> Self {
        Self {
            counter,
            repository,
            flush_lock: Mutex::new(()),
        }
    }

    /// Records one cache-hit click. Never fails: a counter error only loses
    /// this click and is logged.
    pub async fn record_hit(&self, short_code: &str) {
        if let Err(e) = self.counter.increment(short_code).await {
            warn!("Failed to record click for {}: {}", short_code, e);
        }
    }

    /// Clicks recorded for `short_code` that are not yet durable.
    pub async fn pending(&self, short_code: &str) -> CacheResult<i64> {
        self.counter.peek(short_code).await
    }

    /// Drains every pending counter into the durable store.
    ///
    /// Failures on one key are logged and do not stop the others. Concurrent
    /// calls within this process run one after the other.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] only when pending counters cannot be enumerated.
    pub async fn flush(&self) -> Result<FlushReport, CacheError> {
        let _guard = self.flush_lock.lock().await;

        let codes = timed("clicks.pending_codes", self.counter.pending_codes()).await?;
        let mut report = FlushReport {
            keys: codes.len(),
            ..FlushReport::default()
        };

        if codes.is_empty() {
            return Ok(report);
        }

        for code in &codes {
            match self.flush_one(code).await {
                Ok(0) => {}
                Ok(clicks) => {
                    report.flushed += 1;
                    report.clicks += clicks;
                }
                Err(FlushError::Counter(e)) => {
                    report.failed += 1;
                    warn!("Failed to drain pending clicks for {}: {}", code, e);
                }
                Err(FlushError::UnknownCode(delta)) => {
                    report.failed += 1;
                    warn!("Dropping {} pending clicks for unknown code {}", delta, code);
                }
                Err(FlushError::Store(e)) => {
                    report.failed += 1;
                    warn!("Failed to apply pending clicks for {}: {}", code, e);
                }
            }
        }

        Ok(report)
    }

    async fn flush_one(&self, short_code: &str) -> Result<i64, FlushError> {
        let delta = match self.counter.take(short_code).await {
            Ok(Some(delta)) if delta > 0 => delta,
            Ok(_) => return Ok(0),
            Err(e) => return Err(FlushError::Counter(e)),
        };

        let applied = timed(
            "store.apply_batched_increment",
            self.repository.apply_batched_increment(short_code, delta),
        )
        .await;

        match applied {
            Ok(true) => {
                debug!("Flushed {} clicks for {}", delta, short_code);
                Ok(delta)
            }
            Ok(false) => Err(FlushError::UnknownCode(delta)),
            Err(e) => {
                if let Err(restore_err) = self.counter.restore(short_code, delta).await {
                    error!(
                        "Lost {} clicks for {}: restore failed: {}",
                        delta, short_code, restore_err
                    );
                }
                Err(FlushError::Store(e))
            }
        }
    }
}
