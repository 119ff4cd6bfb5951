use crate::traits::ReconnectionStrategy;
use std::time::Duration;

/// Outcome of a connection failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Arm the reconnect timer for `attempt` (1-indexed)
    Retry { attempt: usize, delay: Duration },
    /// Budget spent, give up until the next manual connect
    Exhausted { attempts: usize },
}

/// Consecutive-failure counter paired with a reconnection strategy
///
/// The counter only moves forward while the strategy grants delays, so it
/// never exceeds the strategy's attempt budget. It stays at the cap after
/// exhaustion until [`reset`](Self::reset) is called.
pub struct ReconnectPolicy {
    strategy: Box<dyn ReconnectionStrategy>,
    attempts: usize,
}

impl ReconnectPolicy {
    pub fn new(strategy: Box<dyn ReconnectionStrategy>) -> Self {
        Self {
            strategy,
            attempts: 0,
        }
    }

    /// Register a failed open or unexpected close
    pub fn on_failure(&mut self) -> Backoff {
        let next = self.attempts.saturating_add(1);
        match self.strategy.next_delay(next) {
            Some(delay) => {
                self.attempts = next;
                Backoff::Retry {
                    attempt: next,
                    delay,
                }
            }
            None => Backoff::Exhausted {
                attempts: self.attempts,
            },
        }
    }

    /// Register a successful open, or a manual connect
    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    /// Current consecutive attempt count
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl std::fmt::Debug for ReconnectPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconnectPolicy")
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}
