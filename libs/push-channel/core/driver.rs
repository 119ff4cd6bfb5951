//! Channel driver task
//!
//! # Architecture
//!
//! ```text
//!  connect()/disconnect() ──> Command inbox ─┐
//!                                             ├─> select! ──> state transition ──> sink / events
//!  Link::next_event() ─────────────────────────┘
//!     Connecting         → OpenFinished
//!     Open               → Frame | Closed
//!     ReconnectScheduled → TimerFired
//! ```
//!
//! Every input goes through one loop, so transitions never overlap. The
//! [`Link`] owns whatever resource its state needs (pending handshake, open
//! connection or reconnect timer). Replacing the link drops the old resource,
//! which is how a timer gets cancelled and why two timers can never be live.

use crate::core::channel::ChannelEvent;
use crate::core::config::ChannelConfig;
use crate::core::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
use crate::core::policy::{Backoff, ReconnectPolicy};
use crate::traits::*;
use crossbeam_channel::Sender;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Sleep;
use tracing::{debug, error, info, warn};

/// Upper bound on the close handshake during disconnect
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Commands sent from the channel handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Connect,
    Disconnect,
    Shutdown,
}

type OpenFuture = Pin<Box<dyn Future<Output = Result<Box<dyn Connection>>> + Send>>;

/// Connection state owning its resource
enum Link {
    Idle,
    Connecting(OpenFuture),
    Open(Box<dyn Connection>),
    ReconnectScheduled {
        attempt: usize,
        timer: Pin<Box<Sleep>>,
    },
}

/// Something happened on the current link
enum LinkEvent {
    OpenFinished(Result<Box<dyn Connection>>),
    Frame(WsMessage),
    Closed(String),
    TimerFired,
}

impl Link {
    fn state(&self) -> ConnectionState {
        match self {
            Link::Idle => ConnectionState::Idle,
            Link::Connecting(_) => ConnectionState::Connecting,
            Link::Open(_) => ConnectionState::Open,
            Link::ReconnectScheduled { .. } => ConnectionState::ReconnectScheduled,
        }
    }

    /// Wait for the next event of the current state
    ///
    /// Cancel-safe: the pending handshake and the timer stay inside the link
    /// when this future is dropped.
    async fn next_event(&mut self) -> LinkEvent {
        match self {
            Link::Idle => std::future::pending::<LinkEvent>().await,
            Link::Connecting(open) => LinkEvent::OpenFinished(open.as_mut().await),
            Link::Open(connection) => match connection.next_frame().await {
                Some(Ok(frame)) => LinkEvent::Frame(frame),
                Some(Err(e)) => LinkEvent::Closed(e.to_string()),
                None => LinkEvent::Closed("stream ended".to_string()),
            },
            Link::ReconnectScheduled { timer, .. } => {
                timer.as_mut().await;
                LinkEvent::TimerFired
            }
        }
    }
}

/// Single-task state machine behind [`NotificationChannel`](crate::core::channel::NotificationChannel)
pub(crate) struct Driver {
    url: String,
    transport: Arc<dyn Transport>,
    parser: Arc<dyn EventParser>,
    sink: Arc<dyn NotificationSink>,
    notification_auto_close: Duration,
    policy: ReconnectPolicy,
    link: Link,
    /// Show the "connected" toast on the next successful open
    announce_open: bool,
    commands: UnboundedReceiver<Command>,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
    events: Sender<ChannelEvent>,
}

impl Driver {
    pub(crate) fn new(
        config: ChannelConfig,
        commands: UnboundedReceiver<Command>,
        state: Arc<AtomicConnectionState>,
        metrics: Arc<AtomicMetrics>,
        events: Sender<ChannelEvent>,
    ) -> Self {
        Self {
            url: config.url,
            transport: config.transport,
            parser: config.parser,
            sink: config.sink,
            notification_auto_close: config.notification_auto_close,
            policy: ReconnectPolicy::new(config.reconnect_strategy),
            link: Link::Idle,
            announce_open: false,
            commands,
            state,
            metrics,
            events,
        }
    }

    /// Main driver loop
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                // Commands win ties so a disconnect beats a timer firing in the same tick
                biased;

                command = self.commands.recv() => match command {
                    Some(Command::Connect) => self.connect(),
                    Some(Command::Disconnect) => self.disconnect().await,
                    Some(Command::Shutdown) | None => {
                        self.disconnect().await;
                        break;
                    }
                },

                event = self.link.next_event() => self.on_link_event(event),
            }
        }

        debug!("Channel driver exiting");
    }

    fn connect(&mut self) {
        match &self.link {
            Link::Connecting(_) | Link::Open(_) => {
                debug!(state = ?self.link.state(), "connect() ignored, channel already active");
                return;
            }
            Link::ReconnectScheduled { attempt, .. } => {
                debug!(attempt = *attempt, "Manual connect cancels pending reconnect");
                self.emit(ChannelEvent::ReconnectCancelled);
            }
            Link::Idle => {}
        }

        self.policy.reset();
        self.metrics.set_current_attempt(0);
        self.announce_open = true;
        self.start_open();
    }

    async fn disconnect(&mut self) {
        self.announce_open = false;

        match std::mem::replace(&mut self.link, Link::Idle) {
            Link::Idle => {
                debug!("disconnect() on idle channel");
                return;
            }
            Link::Connecting(_) => {
                debug!("Abandoning in-flight connection attempt");
            }
            Link::Open(mut connection) => {
                self.state.set(ConnectionState::Idle);
                if tokio::time::timeout(CLOSE_TIMEOUT, connection.close())
                    .await
                    .is_err()
                {
                    debug!("Close handshake timed out");
                }
            }
            Link::ReconnectScheduled { attempt, .. } => {
                debug!(attempt, "Cancelled pending reconnect");
                self.emit(ChannelEvent::ReconnectCancelled);
            }
        }

        self.state.set(ConnectionState::Idle);
        info!("Disconnected from {}", self.url);
        self.emit(ChannelEvent::Disconnected);
    }

    fn on_link_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::OpenFinished(Ok(connection)) => self.on_open(connection),
            LinkEvent::OpenFinished(Err(e)) => {
                warn!("Failed to connect to {}: {}", self.url, e);
                self.on_failure(e.to_string());
            }
            LinkEvent::Frame(frame) => self.on_frame(frame),
            LinkEvent::Closed(reason) => {
                warn!("WebSocket connection closed: {}", reason);
                self.on_failure(reason);
            }
            LinkEvent::TimerFired => {
                debug!(attempt = self.policy.attempts(), "Reconnect timer fired");
                self.start_open();
            }
        }
    }

    fn start_open(&mut self) {
        let transport = Arc::clone(&self.transport);
        let url = self.url.clone();
        debug!("Connecting to {}", self.url);
        self.set_link(Link::Connecting(Box::pin(async move {
            transport.open(&url).await
        })));
    }

    fn on_open(&mut self, connection: Box<dyn Connection>) {
        info!("Connected to {}", self.url);
        self.policy.reset();
        self.metrics.set_current_attempt(0);
        self.set_link(Link::Open(connection));
        self.emit(ChannelEvent::Connected);

        if std::mem::take(&mut self.announce_open) {
            self.sink.show(Toast::connected());
        }
    }

    fn on_failure(&mut self, reason: String) {
        self.emit(ChannelEvent::ConnectionLost(reason));

        match self.policy.on_failure() {
            Backoff::Retry { attempt, delay } => {
                info!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Reconnecting in {:?} (attempt {})",
                    delay,
                    attempt
                );
                self.metrics.increment_reconnects();
                self.metrics.set_current_attempt(attempt);
                self.set_link(Link::ReconnectScheduled {
                    attempt,
                    timer: Box::pin(tokio::time::sleep(delay)),
                });
                self.emit(ChannelEvent::ReconnectScheduled { attempt, delay });
            }
            Backoff::Exhausted { attempts } => {
                error!(attempts, "Max reconnect attempts reached, giving up");
                self.set_link(Link::Idle);
                self.sink.show(Toast::reconnect_failed());
                self.emit(ChannelEvent::GaveUp { attempts });
            }
        }
    }

    fn on_frame(&mut self, frame: WsMessage) {
        self.metrics.increment_received();

        match self.parser.parse(&frame) {
            Ok(InboundEvent::Notification(payload)) => {
                debug!(kind = payload.kind.as_str(), "Notification received");
                self.metrics.increment_shown();
                self.sink
                    .show(Toast::from_notification(&payload, self.notification_auto_close));
            }
            Ok(InboundEvent::Ignored { event }) => {
                debug!(event = %event, "Ignoring unhandled event");
            }
            Err(e) => {
                self.metrics.increment_dropped();
                warn!("Dropping inbound message: {}", e);
            }
        }
    }

    fn set_link(&mut self, link: Link) {
        self.link = link;
        self.state.set(self.link.state());
    }

    fn emit(&self, event: ChannelEvent) {
        // No receiver just means nobody is observing
        let _ = self.events.send(event);
    }
}
