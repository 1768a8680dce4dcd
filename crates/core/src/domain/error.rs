// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Duplicate target: {0}")]
    DuplicateTarget(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
