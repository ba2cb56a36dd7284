//! Reconnection policy for the live feed.

use std::time::Duration;

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RECONNECT_ATTEMPTS,
            interval: RECONNECT_INTERVAL,
        }
    }
}

impl ReconnectPolicy {
    /// Check if another reconnection attempt is allowed.
    ///
    /// # Arguments
    ///
    /// * `current_attempt` - Reconnection attempts already made since the last healthy connection
    ///
    /// # Returns
    ///
    /// `true` while the attempt budget is not exhausted
    pub fn should_attempt_reconnect(&self, current_attempt: u32) -> bool {
        current_attempt < self.max_attempts
    }
}
