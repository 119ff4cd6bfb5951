use crate::traits::*;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for NotificationChannel
///
/// This struct holds everything the driver task needs. It is built using
/// the type-state builder pattern.
pub struct ChannelConfig {
    /// Push endpoint URL (ws:// or wss://)
    pub(crate) url: String,

    /// Transport used to open connections
    pub(crate) transport: Arc<dyn Transport>,

    /// Frame decoder
    pub(crate) parser: Arc<dyn EventParser>,

    /// UI sink receiving toasts
    pub(crate) sink: Arc<dyn NotificationSink>,

    /// Reconnection strategy
    pub(crate) reconnect_strategy: Box<dyn ReconnectionStrategy>,

    /// Auto-close delay applied to forwarded notifications
    pub(crate) notification_auto_close: Duration,
}

impl ChannelConfig {
    /// Get a reference to the URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Auto-close delay for forwarded notifications
    pub fn notification_auto_close(&self) -> Duration {
        self.notification_auto_close
    }
}

impl std::fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelConfig")
            .field("url", &self.url)
            .field("notification_auto_close", &self.notification_auto_close)
            .finish_non_exhaustive()
    }
}
