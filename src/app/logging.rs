//! Progress logging utilities.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Logs progress information about domain probing.
///
/// # Arguments
///
/// * `start_time` - The start time of processing
/// * `completed` - Atomic counter of finished probes
/// * `total` - Number of domains in the input
pub fn log_progress(start_time: Instant, completed: &AtomicUsize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let done = completed.load(Ordering::SeqCst);
    let rate = if elapsed_secs > 0.0 {
        done as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Probed {}/{} domains in {:.2} seconds (~{:.2} domains/sec)",
        done, total, elapsed_secs, rate
    );
}

/// Spawns a task that logs progress every `interval` until `cancel` fires.
pub fn spawn_progress_logger(
    start_time: Instant,
    completed: Arc<AtomicUsize>,
    total: usize,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it so nothing is logged at 0/N
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    log_progress(start_time, &completed, total);
                }
                _ = cancel.cancelled() => {
                    break;
                }
            }
        }
    })
}
