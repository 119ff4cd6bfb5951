//! Integration test: NotifierApp mount lifecycle

use async_trait::async_trait;
use shelf_notifier::app::NotifierApp;
use shelf_notifier::bin_common::RunConfig;
use shelf_notifier::push_channel::{
    self, Connection, ConnectionState, NotificationSink, Toast, Transport, WsMessage,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Transport whose connections open instantly and stay silent
#[derive(Clone, Default)]
struct CountingTransport {
    opens: Arc<AtomicUsize>,
}

struct SilentConnection;

#[async_trait]
impl Transport for CountingTransport {
    async fn open(&self, _url: &str) -> push_channel::Result<Box<dyn Connection>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SilentConnection))
    }
}

#[async_trait]
impl Connection for SilentConnection {
    async fn next_frame(&mut self) -> Option<push_channel::Result<WsMessage>> {
        std::future::pending().await
    }

    async fn close(&mut self) {}
}

#[derive(Clone, Default)]
struct CollectingSink {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl NotificationSink for CollectingSink {
    fn show(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

fn app(transport: &CountingTransport, sink: &CollectingSink) -> NotifierApp {
    let channel = push_channel::builder()
        .url("ws://localhost:8000/ws/notifications")
        .sink(sink.clone())
        .transport(transport.clone())
        .build()
        .unwrap();
    NotifierApp::new(channel, RunConfig::new("test-listener"))
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_double_mount_opens_one_transport() {
    let transport = CountingTransport::default();
    let sink = CollectingSink::default();
    let app = app(&transport, &sink);

    assert!(app.mount());
    assert!(!app.mount());
    settle().await;

    assert_eq!(transport.opens.load(Ordering::SeqCst), 1);
    assert!(app.channel().is_connected());
    assert_eq!(sink.toasts.lock().unwrap().len(), 1);

    app.channel().shutdown().await;
}

#[tokio::test]
async fn test_remount_after_unmount_reconnects() {
    let transport = CountingTransport::default();
    let sink = CollectingSink::default();
    let app = app(&transport, &sink);

    app.mount();
    settle().await;

    assert!(app.unmount());
    assert!(!app.unmount());
    settle().await;
    assert_eq!(app.channel().connection_state(), ConnectionState::Idle);
    assert!(!app.is_mounted());

    assert!(app.mount());
    settle().await;
    assert_eq!(transport.opens.load(Ordering::SeqCst), 2);
    assert!(app.channel().is_connected());

    // Each manual connect announces itself once
    assert_eq!(sink.toasts.lock().unwrap().len(), 2);

    app.channel().shutdown().await;
}

#[tokio::test]
async fn test_stats_reflect_channel_state() {
    let transport = CountingTransport::default();
    let sink = CollectingSink::default();
    let app = app(&transport, &sink);

    app.mount();
    settle().await;

    let stats = app.stats();
    assert!(stats.starts_with("state=Open"), "unexpected stats: {}", stats);
    assert!(stats.contains("reconnects=0"));

    app.channel().shutdown().await;
}
