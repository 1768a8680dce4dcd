// Reporter Port - human-readable outcome lines
use crate::domain::Outcome;
use std::io::Write;
use std::sync::Mutex;
use tracing::debug;

/// Sink for outcome reports
///
/// Called from the scheduler loop only, one call per outcome.
pub trait Reporter: Send + Sync {
    fn report(&self, outcome: &Outcome);
}

/// Writes one `<target> is up!` / `<target> might be down!` line per outcome
pub struct LineReporter<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> LineReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LineReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Reporter for LineReporter<W> {
    fn report(&self, outcome: &Outcome) {
        let mut writer = match self.writer.lock() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };

        // A closed stdout must not take the watcher down
        if let Err(e) = writeln!(writer, "{}", outcome).and_then(|_| writer.flush()) {
            debug!(error = %e, endpoint = %outcome.target, "Failed to write report line");
        }
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::Target;
    use tokio::time::Instant;

    /// Records every outcome with the (tokio) instant it was reported
    #[derive(Default)]
    pub struct RecordingReporter {
        records: Mutex<Vec<(Outcome, Instant)>>,
    }

    impl RecordingReporter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn outcomes(&self) -> Vec<Outcome> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .map(|(o, _)| o.clone())
                .collect()
        }

        pub fn outcomes_for(&self, target: &Target) -> Vec<Outcome> {
            self.outcomes()
                .into_iter()
                .filter(|o| &o.target == target)
                .collect()
        }

        pub fn report_times(&self, target: &Target) -> Vec<Instant> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|(o, _)| &o.target == target)
                .map(|(_, at)| *at)
                .collect()
        }

        pub fn count(&self) -> usize {
            self.records.lock().unwrap().len()
        }

        pub fn count_for(&self, target: &Target) -> usize {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|(o, _)| &o.target == target)
                .count()
        }

        /// Report lines as they would have been printed
        pub fn lines(&self) -> Vec<String> {
            self.outcomes().iter().map(ToString::to_string).collect()
        }
    }

    impl Reporter for RecordingReporter {
        fn report(&self, outcome: &Outcome) {
            self.records
                .lock()
                .unwrap()
                .push((outcome.clone(), Instant::now()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Target;

    #[test]
    fn test_line_reporter_writes_one_line_per_outcome() {
        let reporter = LineReporter::new(Vec::new());
        let up = Target::new("https://www.google.com").unwrap();
        let down = Target::new("https://www.facebook.com").unwrap();

        reporter.report(&Outcome::new(up, true, 1));
        reporter.report(&Outcome::new(down, false, 2));

        let written = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            written,
            "https://www.google.com is up!\nhttps://www.facebook.com might be down!\n"
        );
    }
}
