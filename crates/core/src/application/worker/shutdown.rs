// Shutdown Token - observed by every worker and the scheduler loop

use tokio::sync::watch;

/// Shutdown signal for graceful termination
///
/// Dropping the `ShutdownSender` without calling `shutdown()` also releases
/// every `wait()`, so an abandoned watcher never runs forever.
#[derive(Clone, Debug)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for shutdown signal (returns immediately if already signalled)
    pub async fn wait(&mut self) {
        // wait_for checks the current value first, so a signal sent before
        // this call is not missed
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

/// Shutdown sender
#[derive(Debug)]
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    /// Signal shutdown to the scheduler and all target workers
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    /// Hand out another token for the same signal
    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            rx: self.tx.subscribe(),
        }
    }
}

/// Create a shutdown channel
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}
