//! linkwatch - Main Entry Point
//! Wires the HTTP prober and stdout reporter into the scheduler and runs
//! until Ctrl+C.

mod cli;
mod config;
mod logging;
mod supervisor;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

// Import workspace crates
use linkwatch_core::application::worker::constants::SHUTDOWN_JOIN_TIMEOUT;
use linkwatch_core::application::{shutdown_channel, Scheduler};
use linkwatch_core::port::{LineReporter, SystemTimeProvider};
use linkwatch_infra_http::HttpProber;

use crate::cli::Cli;
use crate::config::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse arguments and initialize logging
    let cli = Cli::parse();
    logging::init(cli.log_format)?;

    info!("linkwatch v{} starting...", VERSION);

    // 2. Load configuration
    let settings = Settings::resolve(&cli)?;
    info!(
        targets = settings.targets.len(),
        cooldown_secs = settings.scheduler.cooldown.as_secs(),
        request_timeout_ms = settings.request_timeout.map(|t| t.as_millis() as u64),
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let prober = Arc::new(HttpProber::new(settings.request_timeout)?);
    let reporter = Arc::new(LineReporter::stdout());
    let time_provider = Arc::new(SystemTimeProvider);

    let scheduler = Scheduler::new(
        settings.targets,
        prober,
        reporter,
        time_provider,
        settings.scheduler,
    )
    .context("Invalid target set")?;

    // 4. Start the watch loop
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let run_handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    info!("Press Ctrl+C to stop");

    // 5. Wait for Ctrl+C (or the scheduler ending on its own), then shut down
    supervisor::supervise(
        run_handle,
        shutdown_tx,
        tokio::signal::ctrl_c(),
        SHUTDOWN_JOIN_TIMEOUT,
    )
    .await?;

    Ok(())
}
