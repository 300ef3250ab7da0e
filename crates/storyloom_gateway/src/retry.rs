//! Tiered retry schedule.

use std::time::Duration;
use storyloom_core::RetryConfig;

/// Delay schedule for generation calls.
///
/// Early failures wait a short interval; the final attempt is preceded by a
/// long cool-down instead, on the theory that a service still failing after
/// the quick retries needs time to recover. No wait ever follows the final
/// attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetrySchedule {
    attempts: u32,
    short: Duration,
    long: Duration,
}

impl RetrySchedule {
    /// Build the schedule from configuration.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            attempts: config.attempts,
            short: Duration::from_secs(config.short_wait_secs),
            long: Duration::from_secs(config.long_wait_secs),
        }
    }

    /// Total attempts per call.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The waits between attempts: one entry fewer than the attempt count,
    /// with the long cool-down in the final slot.
    pub fn delays(&self) -> Vec<Duration> {
        match self.attempts {
            0 | 1 => Vec::new(),
            n => std::iter::repeat(self.short)
                .take(n as usize - 2)
                .chain(std::iter::once(self.long))
                .collect(),
        }
    }
}
