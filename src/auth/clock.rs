// Time source for token expiry checks

use chrono::{DateTime, Utc};

/// Source of the current time
///
/// Swapped for a fixed clock in tests so expiry arithmetic is deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
