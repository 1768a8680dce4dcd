// Prober Port - single reachability check against one target
use crate::domain::Target;
use async_trait::async_trait;

/// Reachability check port
///
/// Implementations:
/// - HttpProber (infra-http): one GET per call
/// - ScriptedProber (mocks): deterministic results for tests
#[async_trait]
pub trait Prober: Send + Sync {
    /// Issue one reachability attempt against `target`
    ///
    /// Returns `true` if the endpoint answered at all, `false` on any
    /// transport-level failure. Never retries and never returns an error:
    /// failures are folded into `false` by the implementation.
    async fn probe(&self, target: &Target) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Scripted result for a target
    #[derive(Debug, Clone)]
    pub enum ProbeScript {
        /// Always reachable
        Up,
        /// Always unreachable
        Down,
        /// Up, Down, Up, ... starting with Up
        Alternating,
        /// Cycles through the given results (empty = Down)
        Sequence(Vec<bool>),
        /// Panic with message (for probe isolation testing)
        Panic(String),
    }

    #[derive(Debug, Default)]
    struct TargetStats {
        calls: usize,
        in_flight: usize,
        max_in_flight: usize,
        dispatched_at: Vec<Instant>,
    }

    /// Mock prober with per-target scripts and in-flight accounting
    pub struct ScriptedProber {
        default_script: ProbeScript,
        scripts: HashMap<Target, ProbeScript>,
        latency: Duration,
        stats: Mutex<HashMap<Target, TargetStats>>,
        dispatch_log: Mutex<Vec<Target>>,
    }

    impl ScriptedProber {
        pub fn new(default_script: ProbeScript) -> Self {
            Self {
                default_script,
                scripts: HashMap::new(),
                latency: Duration::ZERO,
                stats: Mutex::new(HashMap::new()),
                dispatch_log: Mutex::new(Vec::new()),
            }
        }

        pub fn new_up() -> Self {
            Self::new(ProbeScript::Up)
        }

        pub fn with_script(mut self, target: &Target, script: ProbeScript) -> Self {
            self.scripts.insert(target.clone(), script);
            self
        }

        /// Simulated network latency per probe (tokio clock)
        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        pub fn calls(&self, target: &Target) -> usize {
            self.with_stats(target, |s| s.calls)
        }

        pub fn total_calls(&self) -> usize {
            self.stats.lock().unwrap().values().map(|s| s.calls).sum()
        }

        pub fn in_flight(&self, target: &Target) -> usize {
            self.with_stats(target, |s| s.in_flight)
        }

        /// Highest concurrent probe count ever observed for `target`
        pub fn max_in_flight(&self, target: &Target) -> usize {
            self.with_stats(target, |s| s.max_in_flight)
        }

        pub fn dispatch_times(&self, target: &Target) -> Vec<Instant> {
            self.with_stats(target, |s| s.dispatched_at.clone())
        }

        /// Targets in the order their probes started
        pub fn dispatch_log(&self) -> Vec<Target> {
            self.dispatch_log.lock().unwrap().clone()
        }

        fn with_stats<T: Default>(&self, target: &Target, f: impl FnOnce(&TargetStats) -> T) -> T {
            self.stats
                .lock()
                .unwrap()
                .get(target)
                .map(f)
                .unwrap_or_default()
        }

        fn begin(&self, target: &Target) -> usize {
            let mut stats = self.stats.lock().unwrap();
            let entry = stats.entry(target.clone()).or_default();
            let call_index = entry.calls;
            entry.calls += 1;
            entry.in_flight += 1;
            entry.max_in_flight = entry.max_in_flight.max(entry.in_flight);
            entry.dispatched_at.push(Instant::now());
            self.dispatch_log.lock().unwrap().push(target.clone());
            call_index
        }
    }

    /// Decrements the in-flight count on completion, panic or abort
    struct InFlightGuard<'a> {
        prober: &'a ScriptedProber,
        target: &'a Target,
    }

    impl Drop for InFlightGuard<'_> {
        fn drop(&mut self) {
            if let Ok(mut stats) = self.prober.stats.lock() {
                if let Some(entry) = stats.get_mut(self.target) {
                    entry.in_flight = entry.in_flight.saturating_sub(1);
                }
            }
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, target: &Target) -> bool {
            let call_index = self.begin(target);
            let _guard = InFlightGuard {
                prober: self,
                target,
            };

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            let script = self
                .scripts
                .get(target)
                .unwrap_or(&self.default_script);

            match script {
                ProbeScript::Up => true,
                ProbeScript::Down => false,
                ProbeScript::Alternating => call_index % 2 == 0,
                ProbeScript::Sequence(results) if results.is_empty() => false,
                ProbeScript::Sequence(results) => results[call_index % results.len()],
                ProbeScript::Panic(msg) => panic!("{}", msg),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::{ProbeScript, ScriptedProber};
    use super::*;

    #[tokio::test]
    async fn test_scripted_prober_follows_scripts() {
        let a = Target::new("https://a.test").unwrap();
        let b = Target::new("https://b.test").unwrap();
        let c = Target::new("https://c.test").unwrap();

        let prober = ScriptedProber::new_up()
            .with_script(&b, ProbeScript::Down)
            .with_script(&c, ProbeScript::Alternating);

        let mut c_results = Vec::new();
        for _ in 0..4 {
            assert!(prober.probe(&a).await);
            assert!(!prober.probe(&b).await);
            c_results.push(prober.probe(&c).await);
        }

        assert_eq!(c_results, vec![true, false, true, false]);
        assert_eq!(prober.calls(&a), 4);
        assert_eq!(prober.total_calls(), 12);
        assert_eq!(prober.max_in_flight(&a), 1);
        assert_eq!(prober.in_flight(&a), 0);
    }

    #[tokio::test]
    async fn test_empty_sequence_is_down() {
        let t = Target::new("https://empty.test").unwrap();
        let prober = ScriptedProber::new(ProbeScript::Sequence(vec![]));
        assert!(!prober.probe(&t).await);
    }
}
