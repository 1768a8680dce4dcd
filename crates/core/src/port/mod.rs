// Port Layer - Interfaces for external dependencies

pub mod prober;
pub mod reporter;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use prober::Prober;
pub use reporter::{LineReporter, Reporter};
pub use time_provider::{SystemTimeProvider, TimeProvider};
