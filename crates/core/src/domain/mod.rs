// Domain Layer - Pure entities (targets and probe outcomes)

pub mod error;
pub mod outcome;
pub mod target;

// Re-exports
pub use error::DomainError;
pub use outcome::{Outcome, Status};
pub use target::Target;
