//! Timing wrapper for instrumented operations.

use std::future::Future;
use std::time::Instant;
use tracing::debug;

/// Histogram receiving the duration of every [`timed`] call.
pub const OPERATION_DURATION_SECONDS: &str = "tinyurl_operation_duration_seconds";

/// Awaits `fut`, recording its wall-clock duration under `operation`.
///
/// Durations go to the `metrics` facade; without an installed recorder the
/// call is a no-op apart from the debug line.
pub async fn timed<F, T>(operation: &'static str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let output = fut.await;
    let elapsed = start.elapsed();

    metrics::histogram!(OPERATION_DURATION_SECONDS, "operation" => operation)
        .record(elapsed.as_secs_f64());
    debug!("{} took {:?}", operation, elapsed);

    output
}
