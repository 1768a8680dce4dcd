//! Command-line interface

use clap::{Parser, ValueEnum};
use linkwatch_core::application::FirstDispatch;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Development: human-readable with colors
    Pretty,
    /// Production: one JSON object per line
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "linkwatch")]
#[command(about = "Continuously check that a set of endpoints is reachable", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Endpoints to watch (overrides the config file list)
    #[arg(value_name = "URL")]
    pub targets: Vec<String>,

    /// JSON config file
    #[arg(short, long, env = "LINKWATCH_CONFIG")]
    pub config: Option<String>,

    /// Seconds between a target's report and its next check
    #[arg(long, env = "LINKWATCH_COOLDOWN_SECS")]
    pub cooldown_secs: Option<u64>,

    /// When the first check of each target runs (immediate, after_cooldown)
    #[arg(long, env = "LINKWATCH_FIRST_DISPATCH")]
    pub first_dispatch: Option<FirstDispatch>,

    /// Per-request timeout in milliseconds (default: HTTP client default)
    #[arg(long, env = "LINKWATCH_REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// Log format for diagnostics on stderr
    #[arg(long, env = "LINKWATCH_LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}
