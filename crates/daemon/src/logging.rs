//! Diagnostics setup (tracing-subscriber)
//!
//! Diagnostics go to stderr; stdout is reserved for report lines.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::LogFormat;

const DEFAULT_FILTER: &str = "linkwatch=info";

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the default `linkwatch=info` filter.
pub fn init(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("Failed to create env filter")?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format {
        // Production: JSON structured logging
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        // Development: Pretty formatting with colors
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.context("Failed to install tracing subscriber")
}
