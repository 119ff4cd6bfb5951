pub mod slots;

use crate::core::channel::NotificationChannel;
use crate::core::config::ChannelConfig;
use crate::core::envelope::EnvelopeParser;
use crate::core::tungstenite::TungsteniteTransport;
use crate::traits::sink::NOTIFICATION_AUTO_CLOSE;
use crate::traits::*;
use slots::{Missing, Sink, Slot, Url};
use std::sync::Arc;
use std::time::Duration;

/// Type-state builder for NotificationChannel
///
/// `U` and `S` hold the URL and the sink once they are given; until then
/// they are [`Missing`] and `build()` is not callable.
pub struct NotificationChannelBuilder<U: Slot, S: Slot> {
    url: U,
    sink: S,
    options: Options,
}

/// Optional settings, carried unchanged across slot transitions
struct Options {
    transport: Option<Arc<dyn Transport>>,
    parser: Option<Arc<dyn EventParser>>,
    reconnect_strategy: Option<Box<dyn ReconnectionStrategy>>,
    notification_auto_close: Duration,
}

impl NotificationChannelBuilder<Missing, Missing> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            url: Missing,
            sink: Missing,
            options: Options {
                transport: None,
                parser: None,
                reconnect_strategy: None,
                notification_auto_close: NOTIFICATION_AUTO_CLOSE,
            },
        }
    }
}

impl Default for NotificationChannelBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: Slot, S: Slot> NotificationChannelBuilder<U, S> {
    /// Replace the default tokio-tungstenite transport
    pub fn transport(mut self, transport: impl Transport) -> Self {
        self.options.transport = Some(Arc::new(transport));
        self
    }

    /// Replace the default `{event, payload}` envelope parser
    pub fn parser(mut self, parser: impl EventParser) -> Self {
        self.options.parser = Some(Arc::new(parser));
        self
    }

    /// Replace the default linear backoff (3s steps, 5 attempts)
    pub fn reconnect_strategy(mut self, strategy: impl ReconnectionStrategy + 'static) -> Self {
        self.options.reconnect_strategy = Some(Box::new(strategy));
        self
    }

    /// Auto-close delay for forwarded notifications (default 5s)
    pub fn notification_auto_close(mut self, auto_close: Duration) -> Self {
        self.options.notification_auto_close = auto_close;
        self
    }
}

impl<S: Slot> NotificationChannelBuilder<Missing, S> {
    pub fn url(self, url: impl Into<String>) -> NotificationChannelBuilder<Url, S> {
        NotificationChannelBuilder {
            url: Url(url.into()),
            sink: self.sink,
            options: self.options,
        }
    }
}

impl<U: Slot> NotificationChannelBuilder<U, Missing> {
    pub fn sink(self, sink: impl NotificationSink) -> NotificationChannelBuilder<U, Sink> {
        self.shared_sink(Arc::new(sink))
    }

    /// Use a sink that is also held elsewhere
    pub fn shared_sink(self, sink: Arc<dyn NotificationSink>) -> NotificationChannelBuilder<U, Sink> {
        NotificationChannelBuilder {
            url: self.url,
            sink: Sink(sink),
            options: self.options,
        }
    }
}

impl NotificationChannelBuilder<Url, Sink> {
    /// Spawn the channel's driver task on the current tokio runtime
    ///
    /// The channel starts idle; call `connect()` to open it.
    pub fn build(self) -> Result<NotificationChannel> {
        let Url(url) = self.url;
        if url.trim().is_empty() {
            return Err(ChannelError::Configuration("URL must not be empty".into()));
        }
        let options = self.options;

        let config = ChannelConfig {
            url,
            transport: options
                .transport
                .unwrap_or_else(|| Arc::new(TungsteniteTransport)),
            parser: options.parser.unwrap_or_else(|| Arc::new(EnvelopeParser)),
            sink: self.sink.0,
            reconnect_strategy: options
                .reconnect_strategy
                .unwrap_or_else(|| Box::new(LinearBackoff::default())),
            notification_auto_close: options.notification_auto_close,
        };

        NotificationChannel::spawn(config)
    }
}
