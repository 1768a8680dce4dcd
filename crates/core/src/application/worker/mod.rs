// Worker - one persistent probe loop per target

pub mod constants;
mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::scheduler::FirstDispatch;
use crate::domain::{Outcome, Target};
use crate::port::{Prober, TimeProvider};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{debug, error};

/// Outcome handed to the scheduler loop, plus the signal that releases the
/// worker into its cooldown once the outcome has been reported
#[derive(Debug)]
pub(crate) struct Dispatch {
    pub outcome: Outcome,
    pub reported: oneshot::Sender<()>,
}

/// Count of running target workers
///
/// Steady state is exactly one per target; zero once the scheduler has
/// drained after shutdown.
#[derive(Clone, Debug, Default)]
pub struct LiveWorkers(Arc<AtomicUsize>);

impl LiveWorkers {
    pub fn current(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn enter(&self) -> LiveWorkerGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        LiveWorkerGuard(Arc::clone(&self.0))
    }
}

struct LiveWorkerGuard(Arc<AtomicUsize>);

impl Drop for LiveWorkerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Probe loop for a single target: probe -> send -> await report -> cooldown
pub(crate) struct TargetWorker {
    target: Target,
    prober: Arc<dyn Prober>,
    time_provider: Arc<dyn TimeProvider>,
    cooldown: Duration,
    first_dispatch: FirstDispatch,
}

impl TargetWorker {
    pub fn new(
        target: Target,
        prober: Arc<dyn Prober>,
        time_provider: Arc<dyn TimeProvider>,
        cooldown: Duration,
        first_dispatch: FirstDispatch,
    ) -> Self {
        Self {
            target,
            prober,
            time_provider,
            cooldown,
            first_dispatch,
        }
    }

    /// Run until shutdown or until the scheduler loop goes away
    ///
    /// The next probe never starts before the previous outcome has been
    /// reported and the cooldown has elapsed, so a target never has two
    /// checks in flight.
    pub async fn run(
        self,
        outcomes: mpsc::Sender<Dispatch>,
        mut shutdown: ShutdownToken,
        live: LiveWorkers,
    ) {
        let _live = live.enter();
        debug!(endpoint = %self.target, "Worker started");

        if self.first_dispatch == FirstDispatch::AfterCooldown
            && !self.cool_down(&mut shutdown).await
        {
            debug!(endpoint = %self.target, "Worker interrupted before first probe");
            return;
        }

        loop {
            if shutdown.is_shutdown() {
                break;
            }

            let Some(reachable) = self.probe_isolated(&mut shutdown).await else {
                debug!(endpoint = %self.target, "Worker interrupted during probe");
                break;
            };

            let outcome = Outcome::new(
                self.target.clone(),
                reachable,
                self.time_provider.now_millis(),
            );
            let (reported_tx, reported_rx) = oneshot::channel();
            let dispatch = Dispatch {
                outcome,
                reported: reported_tx,
            };

            tokio::select! {
                sent = outcomes.send(dispatch) => {
                    if sent.is_err() {
                        // Scheduler loop is gone
                        break;
                    }
                }
                _ = shutdown.wait() => break,
            }

            tokio::select! {
                acked = reported_rx => {
                    if acked.is_err() {
                        break;
                    }
                }
                _ = shutdown.wait() => break,
            }

            if !self.cool_down(&mut shutdown).await {
                debug!(endpoint = %self.target, "Worker interrupted during cooldown");
                break;
            }
        }

        debug!(endpoint = %self.target, "Worker stopped");
    }

    /// Sleep for the cooldown; false if shutdown arrived first
    async fn cool_down(&self, shutdown: &mut ShutdownToken) -> bool {
        tokio::select! {
            _ = sleep(self.cooldown) => true,
            _ = shutdown.wait() => false,
        }
    }

    /// Run the probe in its own task so a panicking prober only costs one
    /// outcome. Returns None if shutdown arrived first (the probe is aborted).
    async fn probe_isolated(&self, shutdown: &mut ShutdownToken) -> Option<bool> {
        let prober = Arc::clone(&self.prober);
        let target = self.target.clone();
        let mut handle = tokio::spawn(async move { prober.probe(&target).await });

        tokio::select! {
            joined = &mut handle => Some(match joined {
                Ok(reachable) => reachable,
                Err(join_err) if join_err.is_panic() => {
                    let panic_msg = panic_message(join_err.into_panic());
                    error!(
                        endpoint = %self.target,
                        panic_msg = %panic_msg,
                        "Probe panicked, reporting target as down"
                    );
                    false
                }
                Err(join_err) => {
                    error!(endpoint = %self.target, error = %join_err, "Probe task cancelled");
                    false
                }
            }),
            _ = shutdown.wait() => {
                handle.abort();
                None
            }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
