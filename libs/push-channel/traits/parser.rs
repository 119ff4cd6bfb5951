use crate::core::envelope::NotificationPayload;
use crate::traits::error::Result;

/// Frame delivered by a transport connection
/// Can be Text or Binary data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsMessage {
    Text(String),
    Binary(Vec<u8>),
}

impl WsMessage {
    /// Text frames as-is, binary frames only if they hold valid UTF-8
    pub fn as_utf8(&self) -> Option<&str> {
        match self {
            WsMessage::Text(s) => Some(s),
            WsMessage::Binary(b) => std::str::from_utf8(b).ok(),
        }
    }
}

/// Decoded inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A user-facing notification to forward to the sink
    Notification(NotificationPayload),
    /// Well-formed envelope with an event tag this client does not handle
    Ignored { event: String },
}

/// Trait for decoding inbound frames into events
///
/// Called inline by the driver for every frame, in delivery order. An `Err`
/// drops the frame; it never affects the connection.
pub trait EventParser: Send + Sync + 'static {
    /// Decode a received frame
    ///
    /// # Returns
    /// * `Ok(InboundEvent)` - Frame decoded
    /// * `Err(ChannelError::Decode)` - Malformed frame, to be logged and dropped
    fn parse(&self, message: &WsMessage) -> Result<InboundEvent>;
}
