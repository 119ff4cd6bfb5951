//! Common test utilities for push-channel integration tests
//!
//! - `MockWsServer`: a real WebSocket server pushing scripted frames
//! - `ScriptedTransport`: an in-memory transport whose every open attempt is
//!   scripted by the test and timestamped with tokio's (pausable) clock
//! - `RecordingSink`: a sink collecting every toast it is shown

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use push_channel::{
    ChannelError, ChannelEvent, Connection, NotificationChannel, NotificationSink, Toast,
    Transport, WsMessage,
};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Notify};
use tokio::time::Instant;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Inbound frame from the shared notification fixture
pub const BOOK_ADDED: &str =
    r#"{"event":"notification","payload":"{\"message\":\"Book added\",\"type\":\"success\"}"}"#;

// =============================================================================
// Recording sink
// =============================================================================

/// Sink that records every toast
#[derive(Clone, Default)]
pub struct RecordingSink {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().len()
    }
}

impl NotificationSink for RecordingSink {
    fn show(&self, toast: Toast) {
        self.toasts.lock().push(toast);
    }
}

// =============================================================================
// Scripted transport
// =============================================================================

enum Step {
    Fail(String),
    Link(mpsc::UnboundedReceiver<WsMessage>, Arc<AtomicBool>),
    Hang,
}

/// Test-side handle of a scripted connection
pub struct LinkHandle {
    tx: Option<mpsc::UnboundedSender<WsMessage>>,
    closed_by_client: Arc<AtomicBool>,
}

impl LinkHandle {
    /// Deliver a text frame to the channel
    pub fn send_text(&self, text: &str) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(WsMessage::Text(text.to_string()));
        }
    }

    /// Simulate the server dropping the connection
    pub fn drop_link(&mut self) {
        self.tx = None;
    }

    /// Whether the channel called `close()` on this connection
    pub fn closed_by_client(&self) -> bool {
        self.closed_by_client.load(Ordering::Acquire)
    }
}

/// In-memory transport driven by a script of open outcomes
///
/// Once the script runs out every further open fails.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    steps: Arc<Mutex<VecDeque<Step>>>,
    attempts: Arc<Mutex<Vec<Instant>>>,
    opened: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next open attempt fails
    pub fn push_failure(&self) {
        self.steps
            .lock()
            .push_back(Step::Fail("connection refused".to_string()));
    }

    /// Next open attempt never completes its handshake
    pub fn push_hang(&self) {
        self.steps.lock().push_back(Step::Hang);
    }

    /// Next open attempt succeeds; frames are fed through the returned handle
    pub fn push_link(&self) -> LinkHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));
        self.steps
            .lock()
            .push_back(Step::Link(rx, Arc::clone(&closed)));
        LinkHandle {
            tx: Some(tx),
            closed_by_client: closed,
        }
    }

    /// Timestamps of every open attempt
    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().len()
    }

    /// Number of opens that succeeded
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::Acquire)
    }

    /// Gaps between consecutive open attempts, in milliseconds
    pub fn gaps_ms(&self) -> Vec<u64> {
        self.attempts()
            .windows(2)
            .map(|w| (w[1] - w[0]).as_millis() as u64)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn open(&self, _url: &str) -> push_channel::Result<Box<dyn Connection>> {
        self.attempts.lock().push(Instant::now());
        let step = self.steps.lock().pop_front();
        match step {
            Some(Step::Link(rx, closed)) => {
                self.opened.fetch_add(1, Ordering::AcqRel);
                Ok(Box::new(ScriptedConnection { rx, closed }))
            }
            Some(Step::Fail(reason)) => Err(ChannelError::WebSocket(reason)),
            Some(Step::Hang) => std::future::pending().await,
            None => Err(ChannelError::WebSocket("script exhausted".to_string())),
        }
    }
}

struct ScriptedConnection {
    rx: mpsc::UnboundedReceiver<WsMessage>,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn next_frame(&mut self) -> Option<push_channel::Result<WsMessage>> {
        self.rx.recv().await.map(Ok)
    }

    async fn close(&mut self) {
        self.closed.store(true, Ordering::Release);
        self.rx.close();
    }
}

// =============================================================================
// Waiting helpers
// =============================================================================

/// Poll `condition` until it holds, sleeping on tokio's clock between polls
///
/// Works with both real and paused time. Returns false on timeout.
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Drain channel events until one matches `predicate`, collecting everything seen
pub async fn wait_for_event(
    channel: &NotificationChannel,
    timeout: Duration,
    mut predicate: impl FnMut(&ChannelEvent) -> bool,
) -> Vec<ChannelEvent> {
    let mut seen = Vec::new();
    wait_until(timeout, || {
        while let Some(event) = channel.try_recv_event() {
            let done = predicate(&event);
            seen.push(event);
            if done {
                return true;
            }
        }
        false
    })
    .await;
    seen
}

/// Drain every event currently queued
pub fn drain_events(channel: &NotificationChannel) -> Vec<ChannelEvent> {
    std::iter::from_fn(|| channel.try_recv_event()).collect()
}

// =============================================================================
// Mock WebSocket server
// =============================================================================

/// A simple mock push server for testing
///
/// Every accepted connection receives `frames` and is then either held open
/// or closed, depending on `close_after_frames`.
pub struct MockWsServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    accepted: Arc<AtomicUsize>,
}

impl MockWsServer {
    /// Start a server that pushes `frames` and keeps the connection open
    pub async fn start(frames: Vec<String>) -> Self {
        Self::start_with(frames, false).await
    }

    /// Start a server that pushes `frames` and then closes each connection
    pub async fn start_closing(frames: Vec<String>) -> Self {
        Self::start_with(frames, true).await
    }

    async fn start_with(frames: Vec<String>, close_after_frames: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let accepted = Arc::new(AtomicUsize::new(0));

        let shutdown_clone = shutdown.clone();
        let accepted_clone = accepted.clone();
        let frames = Arc::new(frames);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                accepted_clone.fetch_add(1, Ordering::AcqRel);
                                let shutdown = shutdown_clone.clone();
                                let frames = Arc::clone(&frames);
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, shutdown, frames, close_after_frames).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = shutdown_clone.notified() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown,
            accepted,
        }
    }

    async fn handle_connection(
        stream: tokio::net::TcpStream,
        shutdown: Arc<Notify>,
        frames: Arc<Vec<String>>,
        close_after_frames: bool,
    ) {
        use futures::{SinkExt, StreamExt};
        use tokio_tungstenite::accept_async;
        use tokio_tungstenite::tungstenite::Message;

        let ws_stream = match accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                eprintln!("WebSocket handshake failed: {}", e);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        for frame in frames.iter() {
            if write.send(Message::Text(frame.clone())).await.is_err() {
                return;
            }
        }

        if close_after_frames {
            let _ = write.send(Message::Close(None)).await;
            return;
        }

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(msg)) if msg.is_close() => break,
                        Some(Ok(_)) => {}
                        Some(Err(_)) | None => break,
                    }
                }
                _ = shutdown.notified() => {
                    break;
                }
            }
        }
    }

    /// Get the WebSocket URL for this server
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws/notifications", self.addr)
    }

    /// Number of connections accepted so far
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::Acquire)
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockWsServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
