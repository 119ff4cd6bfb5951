//! # push-channel
//!
//! A resilient real-time notification client for a server-push WebSocket
//! endpoint.
//!
//! ## Features
//!
//! - **Single driver task**: Commands, frames and timers are handled by one
//!   `select!` loop, in order, never concurrently
//! - **Explicit state machine**: `Idle | Connecting | Open | ReconnectScheduled`,
//!   with each state owning its resource (handshake, connection, timer)
//! - **Bounded linear backoff**: 3s, 6s, 9s, 12s, 15s, then a persistent alert
//! - **Robust decoding**: Malformed frames are logged and dropped
//! - **Pluggable seams**: Transport, parser, reconnection strategy and UI sink

pub mod core;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core channel functionality
pub use crate::core::{
    builder,
    builder::{slots, NotificationChannelBuilder},
    channel::{ChannelEvent, Metrics, NotificationChannel},
    config::ChannelConfig,
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState},
    envelope::{EnvelopeParser, InboundEnvelope, NotificationKind, NotificationPayload},
    policy::{Backoff, ReconnectPolicy},
    tungstenite::TungsteniteTransport,
};

// Convenience function
pub use crate::core::builder as channel_builder;
