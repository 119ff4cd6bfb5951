use crate::core::builder::{slots, NotificationChannelBuilder};
use crate::core::config::ChannelConfig;
use crate::core::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
use crate::core::driver::{Command, Driver};
use crate::traits::*;
use crossbeam_channel::{unbounded, Receiver};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Lifecycle events published by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Transport opened, attempt counter reset
    Connected,
    /// Channel returned to idle through `disconnect()`
    Disconnected,
    /// Open failed or the connection dropped
    ConnectionLost(String),
    /// Reconnect timer armed
    ReconnectScheduled { attempt: usize, delay: Duration },
    /// Pending reconnect timer cancelled before firing
    ReconnectCancelled,
    /// Attempt budget exhausted, no further reconnects until `connect()`
    GaveUp { attempts: usize },
}

/// Channel metrics snapshot
#[derive(Debug, Clone)]
pub struct Metrics {
    pub messages_received: u64,
    pub notifications_shown: u64,
    pub messages_dropped: u64,
    pub reconnects_scheduled: u64,
    pub current_attempt: usize,
    pub connection_state: ConnectionState,
}

/// Resilient push-notification channel
///
/// Keeps one logical connection to the push endpoint, reconnects with the
/// configured backoff and forwards decoded notifications to the sink.
///
/// All lifecycle calls return immediately and never fail: the work happens
/// on a dedicated driver task, and failures surface as toasts, events and
/// [`is_connected`](Self::is_connected).
///
/// # Example
/// ```ignore
/// let channel = push_channel::builder()
///     .url("ws://localhost:8000/ws/notifications")
///     .sink(TracingSink)
///     .build()?;
///
/// channel.connect();
/// // ...
/// channel.disconnect();
/// ```
pub struct NotificationChannel {
    url: String,
    /// Driver command inbox
    command_tx: UnboundedSender<Command>,
    /// Atomic connection state
    state: Arc<AtomicConnectionState>,
    /// Atomic metrics
    metrics: Arc<AtomicMetrics>,
    /// Event channel receiver
    event_rx: Receiver<ChannelEvent>,
    /// Driver task handle, taken by `shutdown()`
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationChannel {
    /// Create a new channel builder
    pub fn builder() -> NotificationChannelBuilder<slots::Missing, slots::Missing> {
        NotificationChannelBuilder::new()
    }

    /// Spawn the driver task
    ///
    /// Called by the builder's `build()` method.
    pub(crate) fn spawn(config: ChannelConfig) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            ChannelError::Configuration(format!(
                "NotificationChannel must be built inside a tokio runtime: {}",
                e
            ))
        })?;

        let url = config.url.clone();
        let state = Arc::new(AtomicConnectionState::new(ConnectionState::Idle));
        let metrics = Arc::new(AtomicMetrics::new());

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = unbounded();

        let driver = Driver::new(
            config,
            command_rx,
            Arc::clone(&state),
            Arc::clone(&metrics),
            event_tx,
        );
        let task_handle = runtime.spawn(driver.run());

        Ok(Self {
            url,
            command_tx,
            state,
            metrics,
            event_rx,
            task_handle: Mutex::new(Some(task_handle)),
        })
    }

    /// Push endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open the channel
    ///
    /// Idempotent: ignored while connecting or open. A pending reconnect is
    /// cancelled and replaced by an immediate attempt with a fresh budget.
    pub fn connect(&self) {
        self.send(Command::Connect);
    }

    /// Close the channel
    ///
    /// Cancels any pending reconnect, closes an open transport and leaves the
    /// channel idle. Safe to call in any state.
    pub fn disconnect(&self) {
        self.send(Command::Disconnect);
    }

    /// Check if the transport is open
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Get current connection state
    #[inline]
    pub fn connection_state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Consecutive reconnect attempts in the current failure streak
    #[inline]
    pub fn reconnect_attempts(&self) -> usize {
        self.metrics.current_attempt()
    }

    /// Get current metrics
    pub fn metrics(&self) -> Metrics {
        Metrics {
            messages_received: self.metrics.messages_received(),
            notifications_shown: self.metrics.notifications_shown(),
            messages_dropped: self.metrics.messages_dropped(),
            reconnects_scheduled: self.metrics.reconnects_scheduled(),
            current_attempt: self.metrics.current_attempt(),
            connection_state: self.state.get(),
        }
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<ChannelEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event, blocking the current thread up to `timeout`
    ///
    /// For host threads outside the runtime. Inside a multi-threaded runtime
    /// wrap the call in `tokio::task::block_in_place`.
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<ChannelEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Disconnect and wait for the driver task to exit
    pub async fn shutdown(&self) {
        info!("Shutting down notification channel");
        self.send(Command::Shutdown);

        let handle = self.task_handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn send(&self, command: Command) {
        if self.command_tx.send(command).is_err() {
            debug!("Channel driver has stopped, ignoring {:?}", command);
        }
    }
}

impl Drop for NotificationChannel {
    fn drop(&mut self) {
        // Driver closes the transport and exits on its own
        let _ = self.command_tx.send(Command::Shutdown);
    }
}

impl std::fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("url", &self.url)
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}
