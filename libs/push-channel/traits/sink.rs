use crate::core::envelope::{NotificationKind, NotificationPayload};
use crossbeam_channel::Sender;
use std::fmt;
use std::time::Duration;
use tracing::{error, info, warn};

/// Auto-close delay for forwarded notifications
pub const NOTIFICATION_AUTO_CLOSE: Duration = Duration::from_millis(5000);

/// Auto-close delay for the "connected" toast
pub const CONNECTED_AUTO_CLOSE: Duration = Duration::from_millis(2000);

/// Display color of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastColor {
    Blue,
    Green,
    Yellow,
    Red,
    Gray,
}

impl ToastColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastColor::Blue => "blue",
            ToastColor::Green => "green",
            ToastColor::Yellow => "yellow",
            ToastColor::Red => "red",
            ToastColor::Gray => "gray",
        }
    }
}

impl fmt::Display for ToastColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<NotificationKind> for ToastColor {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Info => ToastColor::Blue,
            NotificationKind::Success => ToastColor::Green,
            NotificationKind::Warning => ToastColor::Yellow,
            NotificationKind::Error => ToastColor::Red,
            NotificationKind::Unknown => ToastColor::Gray,
        }
    }
}

/// Display title for a notification category
pub fn title_for(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Info => "Info",
        NotificationKind::Success => "Success",
        NotificationKind::Warning => "Warning",
        NotificationKind::Error => "Error",
        NotificationKind::Unknown => "Notification",
    }
}

/// A toast/alert handed to the UI sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub color: ToastColor,
    /// `None` keeps the toast on screen until dismissed
    pub auto_close: Option<Duration>,
}

impl Toast {
    /// Project a decoded notification into a toast
    pub fn from_notification(payload: &NotificationPayload, auto_close: Duration) -> Self {
        Self {
            title: title_for(payload.kind).to_string(),
            message: payload.message.clone(),
            color: payload.kind.into(),
            auto_close: Some(auto_close),
        }
    }

    /// Shown once on the first successful open after `connect()`
    pub fn connected() -> Self {
        Self {
            title: "WebSocket Connected".to_string(),
            message: "Real-time notifications are now enabled.".to_string(),
            color: ToastColor::Green,
            auto_close: Some(CONNECTED_AUTO_CLOSE),
        }
    }

    /// Shown when the attempt budget is exhausted
    pub fn reconnect_failed() -> Self {
        Self {
            title: "WebSocket Disconnected".to_string(),
            message: "Failed to reconnect to real-time notifications.".to_string(),
            color: ToastColor::Red,
            auto_close: None,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.auto_close.is_none()
    }
}

/// Presentation layer that renders toasts
///
/// Called inline from the driver task; implementations must not block.
pub trait NotificationSink: Send + Sync + 'static {
    /// Display a toast (fire-and-forget)
    fn show(&self, toast: Toast);
}

/// Renders toasts as structured log events
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn show(&self, toast: Toast) {
        let auto_close_ms = toast.auto_close.map(|d| d.as_millis() as u64);
        match toast.color {
            ToastColor::Red if toast.is_persistent() => error!(
                color = %toast.color,
                persistent = true,
                "[{}] {}",
                toast.title,
                toast.message
            ),
            ToastColor::Red | ToastColor::Yellow => warn!(
                color = %toast.color,
                auto_close_ms = ?auto_close_ms,
                "[{}] {}",
                toast.title,
                toast.message
            ),
            _ => info!(
                color = %toast.color,
                auto_close_ms = ?auto_close_ms,
                "[{}] {}",
                toast.title,
                toast.message
            ),
        }
    }
}

/// Forwards toasts to a crossbeam channel for an embedding UI thread
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Toast>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Toast>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn show(&self, toast: Toast) {
        // Receiver gone means the UI is tearing down
        let _ = self.tx.send(toast);
    }
}
