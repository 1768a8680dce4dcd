//! Scheduler supervision
//! Waits for a stop signal (Ctrl+C in production), then shuts the scheduler
//! down and joins it within a deadline.

use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use linkwatch_core::application::{RunSummary, ShutdownSender};

/// Handle of a spawned `Scheduler::run`
pub type RunHandle = JoinHandle<linkwatch_core::Result<RunSummary>>;

/// Block until `stop_signal` resolves or the scheduler ends on its own
///
/// Returns the run summary, or `None` if the scheduler did not stop within
/// `join_timeout` (its task is aborted then).
pub async fn supervise<S>(
    mut run_handle: RunHandle,
    shutdown_tx: ShutdownSender,
    stop_signal: S,
    join_timeout: Duration,
) -> Result<Option<RunSummary>>
where
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        signal = stop_signal => {
            signal.context("Failed to listen for the stop signal")?;
            info!("Shutdown signal received. Stopping watcher...");
        }
        finished = &mut run_handle => {
            let summary = finished.context("Scheduler task failed")??;
            warn!(outcomes = summary.outcomes, "Scheduler stopped without a shutdown signal");
            return Ok(Some(summary));
        }
    }

    shutdown_tx.shutdown();
    match tokio::time::timeout(join_timeout, &mut run_handle).await {
        Ok(joined) => {
            let summary = joined.context("Scheduler task failed")??;
            info!(
                outcomes = summary.outcomes,
                up = summary.up,
                down = summary.down,
                transitions = summary.transitions,
                "Shutdown complete."
            );
            Ok(Some(summary))
        }
        Err(_) => {
            warn!(
                timeout_secs = join_timeout.as_secs(),
                "Scheduler did not stop in time, exiting anyway"
            );
            run_handle.abort();
            Ok(None)
        }
    }
}
