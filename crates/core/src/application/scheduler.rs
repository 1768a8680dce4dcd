//! Scheduler - owns the target set and drives the check/report/re-check cycle
//!
//! - One persistent worker task per target (probe -> report -> cooldown)
//! - All workers fan in to one shared outcome channel
//! - A single consumption loop reports outcomes in completion order and
//!   releases each worker into its cooldown
//! - Runs until the shutdown token fires

use crate::application::worker::constants::{DEFAULT_COOLDOWN, OUTCOME_CHANNEL_CAPACITY};
use crate::application::worker::{Dispatch, LiveWorkers, ShutdownToken, TargetWorker};
use crate::domain::{DomainError, Status, Target};
use crate::error::{AppError, Result};
use crate::port::{Prober, Reporter, TimeProvider};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// When a target's first probe is dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstDispatch {
    /// Probe every target right away, cooldown only between later probes
    #[default]
    Immediate,
    /// Wait one cooldown before the first probe as well
    AfterCooldown,
}

impl FromStr for FirstDispatch {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "immediate" => Ok(FirstDispatch::Immediate),
            "after_cooldown" | "after-cooldown" => Ok(FirstDispatch::AfterCooldown),
            other => Err(AppError::Config(format!(
                "unknown first dispatch policy: {other} (expected immediate or after_cooldown)"
            ))),
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Wait between a target's report and its next probe
    pub cooldown: Duration,
    pub first_dispatch: FirstDispatch,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            first_dispatch: FirstDispatch::Immediate,
        }
    }
}

/// Totals for one scheduler run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: u64,
    pub up: u64,
    pub down: u64,
    /// Up -> Down or Down -> Up changes (first observation excluded)
    pub transitions: u64,
}

/// Scheduler orchestrates dispatch, collection, reporting and re-dispatch
pub struct Scheduler {
    targets: Vec<Target>,
    prober: Arc<dyn Prober>,
    reporter: Arc<dyn Reporter>,
    time_provider: Arc<dyn TimeProvider>,
    config: SchedulerConfig,
    live_workers: LiveWorkers,
    running: AtomicBool,
}

/// Clears the running flag when `run` returns or its future is dropped
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Scheduler {
    /// Create a scheduler for a fixed, non-empty set of distinct targets
    ///
    /// Duplicates are rejected: two workers on one target would mean two
    /// concurrent checks against it.
    pub fn new(
        targets: Vec<Target>,
        prober: Arc<dyn Prober>,
        reporter: Arc<dyn Reporter>,
        time_provider: Arc<dyn TimeProvider>,
        config: SchedulerConfig,
    ) -> Result<Self> {
        if targets.is_empty() {
            return Err(AppError::Validation("no targets to watch".to_string()));
        }

        let mut seen = HashSet::with_capacity(targets.len());
        for target in &targets {
            if !seen.insert(target) {
                return Err(DomainError::DuplicateTarget(target.to_string()).into());
            }
        }

        if config.cooldown.is_zero() {
            warn!("Cooldown is zero, targets will be probed back to back");
        }

        Ok(Self {
            targets,
            prober,
            reporter,
            time_provider,
            config,
            live_workers: LiveWorkers::default(),
            running: AtomicBool::new(false),
        })
    }

    /// Gauge of running target workers (shared, stays valid after `run`)
    pub fn live_workers(&self) -> LiveWorkers {
        self.live_workers.clone()
    }

    /// Run the watch loop until `shutdown` fires
    ///
    /// All workers are joined before returning, so no probe or cooldown
    /// outlives this call. Only one run may be active at a time; a second
    /// concurrent call fails with `AppError::Validation`.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<RunSummary> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::Validation("scheduler is already running".to_string()));
        }
        let _running = RunningGuard(&self.running);

        let (tx, mut rx) = mpsc::channel::<Dispatch>(OUTCOME_CHANNEL_CAPACITY);
        let mut workers = JoinSet::new();

        for target in &self.targets {
            let worker = TargetWorker::new(
                target.clone(),
                Arc::clone(&self.prober),
                Arc::clone(&self.time_provider),
                self.config.cooldown,
                self.config.first_dispatch,
            );
            workers.spawn(worker.run(tx.clone(), shutdown.clone(), self.live_workers.clone()));
        }
        // Only workers hold senders now; recv() yields None once they all exit
        drop(tx);

        info!(
            targets = self.targets.len(),
            cooldown_ms = self.config.cooldown.as_millis() as u64,
            first_dispatch = ?self.config.first_dispatch,
            "Scheduler started"
        );

        let mut last_status: HashMap<Target, Status> = HashMap::with_capacity(self.targets.len());
        let mut summary = RunSummary::default();

        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Some(dispatch) => self.handle_dispatch(dispatch, &mut last_status, &mut summary),
                    None => {
                        warn!("All target workers exited");
                        break;
                    }
                },
                _ = shutdown.wait() => {
                    info!("Scheduler shutting down");
                    break;
                }
            }
        }

        // Closing the channel releases any worker blocked on send or ack
        drop(rx);

        let mut failed = 0usize;
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Target worker failed");
                failed += 1;
            }
        }

        info!(
            outcomes = summary.outcomes,
            up = summary.up,
            down = summary.down,
            transitions = summary.transitions,
            "Scheduler stopped"
        );

        if failed > 0 {
            return Err(AppError::Internal(format!("{failed} target worker(s) failed")));
        }
        Ok(summary)
    }

    fn handle_dispatch(
        &self,
        dispatch: Dispatch,
        last_status: &mut HashMap<Target, Status>,
        summary: &mut RunSummary,
    ) {
        let Dispatch { outcome, reported } = dispatch;
        let status = outcome.status();

        self.reporter.report(&outcome);

        summary.outcomes += 1;
        match status {
            Status::Up => summary.up += 1,
            Status::Down => summary.down += 1,
        }

        match last_status.insert(outcome.target.clone(), status) {
            Some(previous) if previous != status => {
                summary.transitions += 1;
                warn!(
                    endpoint = %outcome.target,
                    from = %previous,
                    to = %status,
                    "Status changed"
                );
            }
            Some(_) => debug!(endpoint = %outcome.target, status = %status, "Status unchanged"),
            None => info!(endpoint = %outcome.target, status = %status, "Initial status"),
        }

        // Worker may already be gone on shutdown; nothing left to release then
        let _ = reported.send(());
    }
}
