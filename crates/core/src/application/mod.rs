// Application Layer - Scheduling and per-target workers

pub mod scheduler;
pub mod worker;

// Re-exports
pub use scheduler::{FirstDispatch, RunSummary, Scheduler, SchedulerConfig};
pub use worker::{shutdown_channel, LiveWorkers, ShutdownSender, ShutdownToken};
