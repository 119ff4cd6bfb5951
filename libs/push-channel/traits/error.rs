use thiserror::Error;

/// Main error type for push-channel
#[derive(Error, Debug)]
pub enum ChannelError {
    /// WebSocket transport error (handshake rejected, I/O failure, invalid frame)
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Inbound envelope or payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for ChannelError {
    fn from(err: serde_json::Error) -> Self {
        ChannelError::Decode(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ChannelError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ChannelError::WebSocket(err.to_string())
    }
}

/// Result type for push-channel operations
pub type Result<T> = std::result::Result<T, ChannelError>;
