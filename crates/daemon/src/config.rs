//! Configuration loading and precedence (CLI/env > file > defaults)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use linkwatch_core::application::{FirstDispatch, SchedulerConfig};
use linkwatch_core::domain::Target;

use crate::cli::Cli;

/// Watched when neither the command line nor the config file names any
pub const DEFAULT_TARGETS: &[&str] = &[
    "https://www.google.com",
    "https://www.facebook.com",
    "https://www.stackoverflow.com",
    "https://www.golang.org",
    "https://amazon.com",
];

/// On-disk config file (JSON)
///
/// ```text
/// {
///   "targets": ["https://www.google.com", "https://amazon.com"],
///   "cooldown_secs": 5,
///   "first_dispatch": "immediate",
///   "request_timeout_ms": 10000
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
    #[serde(default)]
    pub targets: Vec<String>,
    pub cooldown_secs: Option<u64>,
    pub first_dispatch: Option<FirstDispatch>,
    pub request_timeout_ms: Option<u64>,
}

impl WatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }
}

/// Fully resolved settings for one run
#[derive(Debug)]
pub struct Settings {
    pub targets: Vec<Target>,
    pub scheduler: SchedulerConfig,
    pub request_timeout: Option<Duration>,
}

impl Settings {
    /// Merge CLI/env values over the config file (if any) over defaults
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(raw) => {
                let path = shellexpand::tilde(raw).into_owned();
                WatchConfig::load(Path::new(&path))?
            }
            None => WatchConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: WatchConfig) -> Result<Self> {
        let raw_targets: Vec<String> = if !cli.targets.is_empty() {
            cli.targets.clone()
        } else if !file.targets.is_empty() {
            file.targets
        } else {
            DEFAULT_TARGETS.iter().map(|s| s.to_string()).collect()
        };

        let targets = raw_targets
            .into_iter()
            .map(Target::new)
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Invalid target")?;

        let defaults = SchedulerConfig::default();
        let cooldown = cli
            .cooldown_secs
            .or(file.cooldown_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.cooldown);
        let first_dispatch = cli
            .first_dispatch
            .or(file.first_dispatch)
            .unwrap_or(defaults.first_dispatch);

        let request_timeout = cli
            .request_timeout_ms
            .or(file.request_timeout_ms)
            .map(Duration::from_millis);

        Ok(Self {
            targets,
            scheduler: SchedulerConfig {
                cooldown,
                first_dispatch,
            },
            request_timeout,
        })
    }
}
