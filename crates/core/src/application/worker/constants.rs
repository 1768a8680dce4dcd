// Worker constants (no magic values)
use std::time::Duration;

/// Cooldown between a target's report and its next probe (5s)
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);

/// Capacity of the shared outcome channel
/// tokio has no rendezvous channel; 1 is the closest to unbuffered
pub const OUTCOME_CHANNEL_CAPACITY: usize = 1;

/// How long the daemon waits for the scheduler to drain on shutdown (5s)
pub const SHUTDOWN_JOIN_TIMEOUT: Duration = Duration::from_secs(5);
