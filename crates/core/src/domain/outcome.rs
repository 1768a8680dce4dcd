// Outcome Domain Model

use super::target::Target;
use std::fmt;

/// Reachability classification of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Up,
    Down,
}

impl Status {
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            Status::Up
        } else {
            Status::Down
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Up => write!(f, "UP"),
            Status::Down => write!(f, "DOWN"),
        }
    }
}

/// Result of one completed probe
///
/// Produced exactly once per dispatch and consumed exactly once by the
/// scheduler. `Display` renders the report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub target: Target,
    pub reachable: bool,
    pub checked_at: i64, // epoch ms
}

impl Outcome {
    pub fn new(target: Target, reachable: bool, checked_at: i64) -> Self {
        Self {
            target,
            reachable,
            checked_at,
        }
    }

    pub fn status(&self) -> Status {
        Status::from_reachable(self.reachable)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            Status::Up => write!(f, "{} is up!", self.target),
            Status::Down => write!(f, "{} might be down!", self.target),
        }
    }
}
