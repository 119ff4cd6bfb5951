use crate::traits::error::Result;
use crate::traits::parser::WsMessage;
use async_trait::async_trait;

/// Opens connections to the push endpoint
///
/// Implement this trait to swap the network stack, e.g. a scripted
/// transport in tests. The default is
/// [`TungsteniteTransport`](crate::core::tungstenite::TungsteniteTransport).
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Open a connection to `url`
    ///
    /// # Returns
    /// * `Ok(connection)` - Handshake completed, connection is open
    /// * `Err(ChannelError)` - Endpoint unreachable or handshake rejected
    async fn open(&self, url: &str) -> Result<Box<dyn Connection>>;
}

/// An open, inbound-only connection
#[async_trait]
pub trait Connection: Send {
    /// Wait for the next data frame
    ///
    /// Control frames are handled internally and never returned.
    /// Must be cancel-safe: the driver drops this future whenever a command
    /// arrives first.
    ///
    /// # Returns
    /// * `Some(Ok(frame))` - A text or binary frame
    /// * `Some(Err(e))` - Transport error, the connection is unusable
    /// * `None` - The peer closed the connection
    async fn next_frame(&mut self) -> Option<Result<WsMessage>>;

    /// Close the connection gracefully
    async fn close(&mut self);
}
