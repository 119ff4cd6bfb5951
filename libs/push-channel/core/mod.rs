//! # push-channel core
//!
//! Client side of a server-push notification endpoint: one transport
//! connection, bounded linear-backoff reconnects, envelope decoding and
//! toast delivery to a UI sink.
//!
//! ## Example
//!
//! ```rust,ignore
//! use push_channel::core::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let channel = push_channel::builder()
//!         .url("ws://localhost:8000/ws/notifications")
//!         .sink(TracingSink)
//!         .reconnect_strategy(LinearBackoff::new(Duration::from_secs(3), 5))
//!         .build()?;
//!
//!     channel.connect();
//!     tokio::time::sleep(Duration::from_secs(60)).await;
//!
//!     while let Some(event) = channel.try_recv_event() {
//!         println!("Event: {:?}", event);
//!     }
//!
//!     channel.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod channel;
pub mod config;
pub mod connection_state;
pub(crate) mod driver;
pub mod envelope;
pub mod policy;
pub mod tungstenite;

// Re-export main types
pub use builder::{slots, NotificationChannelBuilder};
pub use channel::{ChannelEvent, Metrics, NotificationChannel};
pub use config::ChannelConfig;
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
pub use envelope::{EnvelopeParser, InboundEnvelope, NotificationKind, NotificationPayload};
pub use policy::{Backoff, ReconnectPolicy};
pub use tungstenite::TungsteniteTransport;

// Re-export traits for convenience
pub use crate::traits::*;

/// Create a new notification channel builder
///
/// This is a convenience function for starting the builder pattern.
///
/// # Example
/// ```ignore
/// let channel = push_channel::builder()
///     .url("ws://localhost:8000/ws/notifications")
///     .sink(TracingSink)
///     .build()?;
/// ```
pub fn builder() -> NotificationChannelBuilder<slots::Missing, slots::Missing> {
    NotificationChannelBuilder::new()
}
