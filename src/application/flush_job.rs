//! Periodic click flush task.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info};

use crate::application::services::ClickAggregator;
use crate::domain::repositories::MappingRepository;

/// Handle to the running flush task.
///
/// Dropping the handle leaves the task running until the runtime shuts down;
/// call [`FlushJob::stop`] to stop it with a final drain.
pub struct FlushJob {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl FlushJob {
    /// Signals the task, waits for its final flush cycle and joins it.
    pub async fn stop(self) {
        // The receiver is gone only if the task already exited.
        let _ = self.shutdown.send(());

        if let Err(e) = self.handle.await {
            error!("Click flush task failed: {}", e);
        }
    }
}

/// Starts flushing pending clicks every `period`.
///
/// The first cycle runs one full period after start. A cycle that overruns
/// delays the next one instead of triggering a burst.
pub fn spawn_flush_job<R>(aggregator: Arc<ClickAggregator<R>>, period: Duration) -> FlushJob
where
    R: MappingRepository + ?Sized + 'static,
{
    let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Click flush job started (period {:?})", period);

        loop {
            tokio::select! {
                _ = ticker.tick() => run_cycle(&aggregator).await,
                _ = &mut shutdown_rx => {
                    info!("Click flush job stopping, draining pending clicks");
                    run_cycle(&aggregator).await;
                    break;
                }
            }
        }

        info!("Click flush job stopped");
    });

    FlushJob { shutdown, handle }
}

async fn run_cycle<R: MappingRepository + ?Sized>(aggregator: &ClickAggregator<R>) {
    match aggregator.flush().await {
        Ok(report) if report.is_empty() => debug!("No pending clicks to flush"),
        Ok(report) => info!(
            "Flushed {} clicks for {} codes ({} failed of {} pending)",
            report.clicks, report.flushed, report.failed, report.keys
        ),
        Err(e) => error!("Click flush cycle failed: {}", e),
    }
}
