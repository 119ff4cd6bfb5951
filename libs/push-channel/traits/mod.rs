//! # push-channel traits
//!
//! Seams of the notification channel:
//!
//! - **Transport / Connection**: Open the push endpoint and read frames
//! - **EventParser**: Decode inbound frames into events
//! - **ReconnectionStrategy**: Control reconnection delays and the attempt budget
//! - **NotificationSink**: Render toasts in the host UI
//!
//! ## Example
//!
//! ```rust,ignore
//! use push_channel::traits::*;
//!
//! struct StatusBarSink;
//!
//! impl NotificationSink for StatusBarSink {
//!     fn show(&self, toast: Toast) {
//!         status_bar::flash(&toast.title, &toast.message);
//!     }
//! }
//! ```

pub mod error;
pub mod parser;
pub mod reconnect;
pub mod sink;
pub mod transport;

// Re-export commonly used types
pub use error::{ChannelError, Result};
pub use parser::{EventParser, InboundEvent, WsMessage};
pub use reconnect::{LinearBackoff, NeverReconnect, ReconnectionStrategy};
pub use sink::{ChannelSink, NotificationSink, Toast, ToastColor, TracingSink};
pub use transport::{Connection, Transport};
