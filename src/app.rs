//! Notifier application
//!
//! Owns the notification channel and ties it to a mount/unmount lifecycle.

use crate::bin_common::{BinaryRunner, RunConfig};
use crate::config::NotifierConfig;
use push_channel::{LinearBackoff, NotificationChannel, NotificationSink, TracingSink};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Composition root of the notification listener
///
/// `mount()` connects at most once per mount cycle, so a host that
/// double-invokes its mount hook still opens a single transport.
pub struct NotifierApp {
    channel: NotificationChannel,
    mounted: AtomicBool,
    run_config: RunConfig,
}

impl NotifierApp {
    pub fn new(channel: NotificationChannel, run_config: RunConfig) -> Self {
        Self {
            channel,
            mounted: AtomicBool::new(false),
            run_config,
        }
    }

    /// Build the channel described by `config`, rendering toasts as log events
    pub fn from_config(config: &NotifierConfig) -> anyhow::Result<Self> {
        Self::with_sink(config, TracingSink)
    }

    /// Build the channel described by `config` with a custom sink
    pub fn with_sink(config: &NotifierConfig, sink: impl NotificationSink) -> anyhow::Result<Self> {
        let channel = push_channel::builder()
            .url(config.endpoint_url())
            .sink(sink)
            .reconnect_strategy(LinearBackoff::new(
                config.reconnect.base_delay(),
                config.reconnect.max_attempts,
            ))
            .notification_auto_close(config.notifications.auto_close())
            .build()?;

        Ok(Self::new(channel, RunConfig::new("Notification Listener")))
    }

    /// Start listening; returns false if already mounted
    pub fn mount(&self) -> bool {
        if self.mounted.swap(true, Ordering::AcqRel) {
            debug!("mount() ignored, already mounted");
            return false;
        }
        self.channel.connect();
        true
    }

    /// Stop listening; returns false if not mounted
    pub fn unmount(&self) -> bool {
        if !self.mounted.swap(false, Ordering::AcqRel) {
            debug!("unmount() ignored, not mounted");
            return false;
        }
        self.channel.disconnect();
        true
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn channel(&self) -> &NotificationChannel {
        &self.channel
    }

    /// One-line summary of the channel metrics
    pub fn stats(&self) -> String {
        let m = self.channel.metrics();
        format!(
            "state={:?} received={} shown={} dropped={} reconnects={} attempt={}",
            m.connection_state,
            m.messages_received,
            m.notifications_shown,
            m.messages_dropped,
            m.reconnects_scheduled,
            m.current_attempt
        )
    }
}

impl BinaryRunner for NotifierApp {
    async fn run(&mut self) -> anyhow::Result<()> {
        info!("Listening on {}", self.channel.url());
        self.mount();

        let mut heartbeat = tokio::time::interval(self.run_config.heartbeat_interval());
        // First tick completes immediately
        heartbeat.tick().await;

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let result = loop {
            tokio::select! {
                signal = &mut ctrl_c => {
                    info!("Shutdown signal received");
                    break signal.map_err(anyhow::Error::from);
                }
                _ = heartbeat.tick() => {
                    info!("Heartbeat: {}", self.stats());
                }
            }
        };

        self.unmount();
        self.channel.shutdown().await;
        result
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }

    fn shutdown_stats(&self) -> Option<String> {
        Some(self.stats())
    }
}
