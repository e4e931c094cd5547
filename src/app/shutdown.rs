//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

/// Stops background tasks once every probe has finished.
///
/// Cancels the progress logger and waits for it so its last line cannot
/// interleave with the final summary.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    logging_task: Option<tokio::task::JoinHandle<()>>,
) {
    cancel.cancel();
    if let Some(logging_task) = logging_task {
        let _ = logging_task.await;
    }
}
