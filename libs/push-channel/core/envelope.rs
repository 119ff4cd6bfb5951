//! Wire format of the notification endpoint
//!
//! Frames are JSON envelopes whose `payload` is itself JSON text:
//!
//! ```text
//! {"event":"notification","payload":"{\"message\":\"Book added\",\"type\":\"success\"}"}
//! ```

use crate::traits::{ChannelError, EventParser, InboundEvent, Result, WsMessage};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Event tag carrying a [`NotificationPayload`]
pub const NOTIFICATION_EVENT: &str = "notification";

/// Outer wire message: an event tag plus an independently encoded payload
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEnvelope {
    pub event: String,
    /// Kept untyped so unknown events with non-string payloads still decode
    #[serde(default)]
    pub payload: Value,
}

/// Notification category, drives toast title and color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
    /// Missing or unrecognised `type`
    #[default]
    #[serde(other)]
    Unknown,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
            NotificationKind::Unknown => "unknown",
        }
    }
}

/// Inner payload of a `notification` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub message: String,
    #[serde(rename = "type", default, deserialize_with = "kind_or_unknown")]
    pub kind: NotificationKind,
}

/// Anything but a known lowercase name (null, numbers, objects) is `Unknown`
fn kind_or_unknown<'de, D>(deserializer: D) -> std::result::Result<NotificationKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(NotificationKind::deserialize(value).unwrap_or_default())
}

impl NotificationPayload {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// Decode the outer envelope from frame text
pub fn decode_envelope(text: &str) -> Result<InboundEnvelope> {
    Ok(serde_json::from_str(text)?)
}

/// Decode a notification payload from the envelope's `payload` field
///
/// The payload must be a JSON string whose content is a [`NotificationPayload`].
pub fn decode_notification(payload: &Value) -> Result<NotificationPayload> {
    let text = payload.as_str().ok_or_else(|| {
        ChannelError::Decode(format!("notification payload is not a string: {}", payload))
    })?;
    Ok(serde_json::from_str(text)?)
}

/// Default parser for the `{event, payload}` envelope format
#[derive(Debug, Clone, Default)]
pub struct EnvelopeParser;

impl EventParser for EnvelopeParser {
    fn parse(&self, message: &WsMessage) -> Result<InboundEvent> {
        let text = message
            .as_utf8()
            .ok_or_else(|| ChannelError::Decode("binary frame is not valid UTF-8".into()))?;

        let envelope = decode_envelope(text)?;

        if envelope.event == NOTIFICATION_EVENT {
            let payload = decode_notification(&envelope.payload)?;
            Ok(InboundEvent::Notification(payload))
        } else {
            Ok(InboundEvent::Ignored {
                event: envelope.event,
            })
        }
    }
}
