use std::time::Duration;

/// Fixed-interval polling policy with a bounded number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of probes, including the first one.
    pub max_attempts: u32,
    /// Delay between two probes.
    pub interval: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Longest time a full polling run can take. Saturates at
    /// `Duration::MAX`.
    pub fn ceiling(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

impl Default for RetryPolicy {
    /// 50 probes, 100 ms apart.
    fn default() -> Self {
        Self::new(50, Duration::from_millis(100))
    }
}
