//! Default transport over tokio-tungstenite

use crate::traits::{Connection, Result, Transport, WsMessage};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport (ws:// and wss://)
#[derive(Debug, Clone, Default)]
pub struct TungsteniteTransport;

#[async_trait]
impl Transport for TungsteniteTransport {
    async fn open(&self, url: &str) -> Result<Box<dyn Connection>> {
        let (stream, response) = connect_async(url).await?;
        debug!(status = %response.status(), "WebSocket handshake completed");
        Ok(Box::new(TungsteniteConnection { stream }))
    }
}

/// Open tokio-tungstenite stream
///
/// Pings are answered by tungstenite itself on the next read.
pub struct TungsteniteConnection {
    stream: WsStream,
}

#[async_trait]
impl Connection for TungsteniteConnection {
    async fn next_frame(&mut self) -> Option<Result<WsMessage>> {
        loop {
            match self.stream.next().await {
                Some(Ok(msg)) => {
                    if let Some(frame) = tungstenite_to_ws_message(msg) {
                        return Some(Ok(frame));
                    }
                }
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    return None;
                }
                Some(Err(e)) => return Some(Err(e.into())),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!("WebSocket close handshake failed: {}", e);
        }
    }
}

/// Convert tungstenite Message to WsMessage
fn tungstenite_to_ws_message(msg: Message) -> Option<WsMessage> {
    match msg {
        Message::Text(text) => Some(WsMessage::Text(text)),
        Message::Binary(data) => Some(WsMessage::Binary(data)),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
    }
}
