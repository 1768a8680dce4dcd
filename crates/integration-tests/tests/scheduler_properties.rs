//! Scheduler behaviour under a paused tokio clock
//!
//! - One probe in flight per target, always
//! - Reported sequences follow each target's own results
//! - Cooldown separates a report from the next dispatch
//! - Initial fan-out covers every target before any second cycle
//! - Worker count stays equal to the target count

use linkwatch_core::application::{
    shutdown_channel, RunSummary, Scheduler, SchedulerConfig, ShutdownSender,
};
use linkwatch_core::domain::{Status, Target};
use linkwatch_core::port::prober::mocks::{ProbeScript, ScriptedProber};
use linkwatch_core::port::reporter::mocks::RecordingReporter;
use linkwatch_core::port::time_provider::mocks::MockTimeProvider;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

const COOLDOWN: Duration = Duration::from_secs(5);

struct Harness {
    scheduler: Arc<Scheduler>,
    reporter: Arc<RecordingReporter>,
    shutdown: ShutdownSender,
    run: JoinHandle<linkwatch_core::Result<RunSummary>>,
}

impl Harness {
    fn start(targets: &[Target], prober: Arc<ScriptedProber>) -> Self {
        let reporter = Arc::new(RecordingReporter::new());
        let scheduler = Arc::new(
            Scheduler::new(
                targets.to_vec(),
                prober,
                reporter.clone(),
                Arc::new(MockTimeProvider::new(1_700_000_000_000)),
                SchedulerConfig {
                    cooldown: COOLDOWN,
                    ..Default::default()
                },
            )
            .unwrap(),
        );

        let (shutdown, token) = shutdown_channel();
        let run = tokio::spawn({
            let scheduler = Arc::clone(&scheduler);
            async move { scheduler.run(token).await }
        });

        Self {
            scheduler,
            reporter,
            shutdown,
            run,
        }
    }

    /// Let the (paused) clock run until every target has `n` reports
    async fn wait_for_reports(&self, targets: &[Target], n: usize) {
        while targets.iter().any(|t| self.reporter.count_for(t) < n) {
            sleep(Duration::from_millis(100)).await;
        }
    }

    async fn stop(self) -> RunSummary {
        self.shutdown.shutdown();
        self.run.await.unwrap().unwrap()
    }
}

fn targets(raw: &[&str]) -> Vec<Target> {
    raw.iter().map(|s| Target::new(*s).unwrap()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_never_two_probes_in_flight_per_target() {
    let targets = targets(&[
        "https://www.google.com",
        "https://www.facebook.com",
        "https://www.stackoverflow.com",
        "https://www.golang.org",
    ]);
    // Probes slower than the cooldown: overlap would show up here
    let prober = Arc::new(ScriptedProber::new_up().with_latency(Duration::from_secs(7)));
    let harness = Harness::start(&targets, prober.clone());

    harness.wait_for_reports(&targets, 5).await;
    harness.stop().await;

    for target in &targets {
        assert_eq!(prober.max_in_flight(target), 1, "overlap on {}", target);
        assert_eq!(prober.in_flight(target), 0);
    }
}

#[tokio::test(start_paused = true)]
async fn test_reported_sequences_follow_target_results() {
    let targets = targets(&["https://always-up.test", "https://always-down.test", "https://flaky.test"]);
    let (a, b, c) = (&targets[0], &targets[1], &targets[2]);

    let prober = Arc::new(
        ScriptedProber::new_up()
            .with_script(b, ProbeScript::Down)
            .with_script(c, ProbeScript::Alternating),
    );
    let harness = Harness::start(&targets, prober);

    harness.wait_for_reports(&targets, 3).await;
    let reporter = harness.reporter.clone();
    harness.stop().await;

    let statuses = |t: &Target| -> Vec<Status> {
        reporter
            .outcomes_for(t)
            .iter()
            .take(3)
            .map(|o| o.status())
            .collect()
    };

    assert_eq!(statuses(a), vec![Status::Up; 3]);
    assert_eq!(statuses(b), vec![Status::Down; 3]);
    assert_eq!(statuses(c), vec![Status::Up, Status::Down, Status::Up]);

    let lines: Vec<String> = reporter
        .outcomes_for(b)
        .iter()
        .take(3)
        .map(ToString::to_string)
        .collect();
    assert!(lines
        .iter()
        .all(|l| l == "https://always-down.test might be down!"));
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_separates_report_from_next_dispatch() {
    let targets = targets(&["https://one.test", "https://two.test", "https://three.test"]);
    let prober = Arc::new(ScriptedProber::new_up().with_latency(Duration::from_millis(250)));
    let harness = Harness::start(&targets, prober.clone());

    harness.wait_for_reports(&targets, 4).await;
    let reporter = harness.reporter.clone();
    harness.stop().await;

    for target in &targets {
        let reports = reporter.report_times(target);
        let dispatches = prober.dispatch_times(target);
        assert!(dispatches.len() >= 4);

        for n in 0..reports.len().min(dispatches.len() - 1) {
            let gap = dispatches[n + 1] - reports[n];
            assert!(
                gap >= COOLDOWN,
                "{}: dispatch {} only {:?} after report {}",
                target,
                n + 1,
                gap,
                n
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_initial_fan_out_reaches_every_target_first() {
    let targets = targets(&[
        "https://k1.test",
        "https://k2.test",
        "https://k3.test",
        "https://k4.test",
        "https://k5.test",
    ]);
    let start = Instant::now();
    let prober = Arc::new(ScriptedProber::new_up());
    let harness = Harness::start(&targets, prober.clone());

    harness.wait_for_reports(&targets, 2).await;
    let reporter = harness.reporter.clone();
    harness.stop().await;

    // The first K outcomes received cover all K targets
    let first_round: HashSet<Target> = reporter
        .outcomes()
        .into_iter()
        .take(targets.len())
        .map(|o| o.target)
        .collect();
    assert_eq!(first_round.len(), targets.len());

    // Likewise the first K probes started hit K distinct targets
    let first_dispatched: HashSet<Target> = prober
        .dispatch_log()
        .into_iter()
        .take(targets.len())
        .collect();
    assert_eq!(first_dispatched.len(), targets.len());

    for target in &targets {
        let dispatches = prober.dispatch_times(target);
        // First check is immediate and simultaneous, second waits a cooldown
        assert_eq!(dispatches[0], start);
        assert!(dispatches[1] - start >= COOLDOWN);
    }
}

#[tokio::test(start_paused = true)]
async fn test_worker_count_stays_equal_to_target_count() {
    let targets = targets(&["https://a.test", "https://b.test", "https://c.test"]);
    let prober = Arc::new(
        ScriptedProber::new(ProbeScript::Sequence(vec![true, false, false]))
            .with_latency(Duration::from_millis(40)),
    );
    let harness = Harness::start(&targets, prober.clone());
    let live = harness.scheduler.live_workers();

    for cycle in [1, 5, 10, 20] {
        harness.wait_for_reports(&targets, cycle).await;
        assert_eq!(live.current(), targets.len(), "after {} cycles", cycle);
    }

    let summary = harness.stop().await;
    assert_eq!(live.current(), 0);
    assert_eq!(summary.outcomes, summary.up + summary.down);
    assert!(summary.outcomes >= 20 * targets.len() as u64);
    // Each probe produced at most one outcome
    assert!(prober.total_calls() as u64 >= summary.outcomes);
    assert!(prober.total_calls() as u64 <= summary.outcomes + targets.len() as u64);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_target_does_not_stop_the_others() {
    let targets = targets(&["https://healthy.test", "https://broken.test"]);
    let prober = Arc::new(
        ScriptedProber::new_up().with_script(&targets[1], ProbeScript::Panic("probe bug".into())),
    );
    let harness = Harness::start(&targets, prober);

    harness.wait_for_reports(&targets, 3).await;
    let reporter = harness.reporter.clone();
    let summary = harness.stop().await;

    assert!(reporter
        .outcomes_for(&targets[1])
        .iter()
        .all(|o| o.status() == Status::Down));
    assert!(reporter
        .outcomes_for(&targets[0])
        .iter()
        .all(|o| o.status() == Status::Up));
    assert_eq!(summary.transitions, 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_cooldown_is_prompt() {
    let targets = targets(&["https://sleepy.test"]);
    let prober = Arc::new(ScriptedProber::new_up());
    let harness = Harness::start(&targets, prober.clone());

    harness.wait_for_reports(&targets, 1).await;
    // Worker is now cooling down for 5s
    let stopped_at = Instant::now();
    let summary = tokio_test::assert_ok!(
        tokio::time::timeout(Duration::from_millis(500), harness.stop()).await
    );

    assert!(Instant::now() - stopped_at < COOLDOWN);
    assert_eq!(summary.outcomes, 1);
    assert_eq!(prober.calls(&targets[0]), 1);
}
