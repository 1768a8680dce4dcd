// linkwatch Core - Domain Logic, Ports & Scheduler
// NO infrastructure dependencies (adapters live in infra crates)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};
