use core::time::Duration;

use crate::time::Timestamp;

/// Forces a republish once the published value is `limit` old.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staleness {
    limit: Option<Duration>,
}

impl Staleness {
    /// `None` or a zero limit never forces.
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            limit: limit.filter(|d| !d.is_zero()),
        }
    }

    pub fn limit(&self) -> Option<Duration> {
        self.limit
    }

    pub fn is_stale(&self, now: Timestamp, last_update: Timestamp) -> bool {
        match self.limit {
            Some(limit) => now.saturating_duration_since(last_update) >= limit,
            None => false,
        }
    }
}
