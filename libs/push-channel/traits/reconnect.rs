use std::time::Duration;

/// Default delay unit for [`LinearBackoff`]
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(3000);

/// Default attempt budget for [`LinearBackoff`]
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Trait for defining reconnection strategies
///
/// The channel consults the strategy after every failed open or unexpected
/// close. Attempt numbers are 1-indexed: the first retry after a healthy
/// connection drops is attempt 1.
pub trait ReconnectionStrategy: Send + Sync {
    /// Get the delay before the given reconnection attempt
    ///
    /// # Arguments
    /// * `attempt` - The reconnection attempt number (1-indexed)
    ///
    /// # Returns
    /// * `Some(duration)` - Wait this long before reconnecting
    /// * `None` - Attempt budget exhausted, stop reconnecting
    fn next_delay(&self, attempt: usize) -> Option<Duration>;

    /// Check if the given attempt is still within budget
    fn should_reconnect(&self, attempt: usize) -> bool;
}

/// Linear backoff reconnection strategy
///
/// The delay before attempt `k` is `base_delay * k`. With the defaults
/// (3s, 5 attempts) the schedule is 3s, 6s, 9s, 12s, 15s and then nothing.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base_delay: Duration,
    max_attempts: usize,
}

impl LinearBackoff {
    /// Create a new linear backoff strategy
    ///
    /// # Arguments
    /// * `base_delay` - Delay unit, multiplied by the attempt number
    /// * `max_attempts` - Maximum number of consecutive attempts
    pub fn new(base_delay: Duration, max_attempts: usize) -> Self {
        Self {
            base_delay,
            max_attempts,
        }
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS)
    }
}

impl ReconnectionStrategy for LinearBackoff {
    fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if !self.should_reconnect(attempt) {
            return None;
        }

        let factor = u32::try_from(attempt).unwrap_or(u32::MAX);
        Some(self.base_delay.saturating_mul(factor))
    }

    fn should_reconnect(&self, attempt: usize) -> bool {
        attempt >= 1 && attempt <= self.max_attempts
    }
}

/// Never reconnect strategy
///
/// The first failure is terminal and reported to the sink immediately
#[derive(Debug, Clone)]
pub struct NeverReconnect;

impl ReconnectionStrategy for NeverReconnect {
    fn next_delay(&self, _attempt: usize) -> Option<Duration> {
        None
    }

    fn should_reconnect(&self, _attempt: usize) -> bool {
        false
    }
}
