//! Lock-free connection state and metrics shared between the driver task and
//! the channel handle.

use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};

/// Observable state of the notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    /// Not connected and not trying to be. Initial state, after `disconnect()`
    /// and after the attempt budget is exhausted.
    Idle = 0,
    /// Transport handshake in flight
    Connecting = 1,
    /// Transport open, frames flowing
    Open = 2,
    /// Waiting on the reconnect timer
    ReconnectScheduled = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Open,
            3 => ConnectionState::ReconnectScheduled,
            _ => ConnectionState::Idle,
        }
    }
}

/// Atomic wrapper around [`ConnectionState`]
///
/// Written only by the driver task, read from any thread.
#[derive(Debug)]
pub struct AtomicConnectionState {
    inner: AtomicU8,
}

impl AtomicConnectionState {
    pub fn new(state: ConnectionState) -> Self {
        Self {
            inner: AtomicU8::new(state as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.inner.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, state: ConnectionState) {
        self.inner.store(state as u8, Ordering::Release);
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.get() == ConnectionState::Open
    }
}

impl Default for AtomicConnectionState {
    fn default() -> Self {
        Self::new(ConnectionState::Idle)
    }
}

/// Atomic counters updated by the driver task
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    messages_received: AtomicU64,
    notifications_shown: AtomicU64,
    messages_dropped: AtomicU64,
    reconnects_scheduled: AtomicU64,
    current_attempt: AtomicUsize,
}

impl AtomicMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_shown(&self) {
        self.notifications_shown.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_reconnects(&self) {
        self.reconnects_scheduled.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn set_current_attempt(&self, attempt: usize) {
        self.current_attempt.store(attempt, Ordering::Release);
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    pub fn notifications_shown(&self) -> u64 {
        self.notifications_shown.load(Ordering::Relaxed)
    }

    pub fn messages_dropped(&self) -> u64 {
        self.messages_dropped.load(Ordering::Relaxed)
    }

    pub fn reconnects_scheduled(&self) -> u64 {
        self.reconnects_scheduled.load(Ordering::Relaxed)
    }

    pub fn current_attempt(&self) -> usize {
        self.current_attempt.load(Ordering::Acquire)
    }
}
