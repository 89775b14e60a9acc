//! Logstash appender for centralized logging
//!
//! Encodes each record with a [`StructuredCodec`] and ships it over TCP or
//! UDP. Encoding happens in `append`; the network write happens on a
//! background task that owns the transport, so the dispatcher never waits
//! on the network and events leave in the order they were appended.

use crate::codec::{CodecKind, EventType, StructuredCodec};
use crate::core::{
    Appender, LogRecord, LoggerError, LoggerMetrics, Notice, NoticeHandler, Result, SinkContext,
};
use crate::transport::{self, Transport, TransportKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Where events are sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub transport: TransportKind,
    pub host: String,
    pub port: u16,
}

/// Configuration of a Logstash sink
///
/// Field names follow the JSON configuration format:
///
/// ```
/// use logall::appenders::LogstashConfig;
///
/// let config: LogstashConfig = serde_json::from_str(r#"{
///     "output": { "transport": "udp", "host": "127.0.0.1", "port": 9990 },
///     "eventType": { "prefix": "app_", "overrides": { "error": "errors" } },
///     "codec": "default"
/// }"#).unwrap();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogstashConfig {
    pub output: OutputConfig,
    #[serde(default)]
    pub event_type: EventType,
    #[serde(default)]
    pub codec: CodecKind,
}

impl LogstashConfig {
    pub fn new(transport: TransportKind, host: impl Into<String>, port: u16) -> Self {
        Self {
            output: OutputConfig {
                transport,
                host: host.into(),
                port,
            },
            event_type: EventType::default(),
            codec: CodecKind::default(),
        }
    }

    #[must_use]
    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    #[must_use]
    pub fn with_codec(mut self, codec: CodecKind) -> Self {
        self.codec = codec;
        self
    }

    /// Reject configurations that cannot address a server
    pub fn validate(&self) -> Result<()> {
        if self.output.host.trim().is_empty() {
            return Err(LoggerError::config("logstash", "output.host must not be empty"));
        }
        if self.output.port == 0 {
            return Err(LoggerError::config("logstash", "output.port must be non-zero"));
        }
        Ok(())
    }
}

enum Command {
    Send(Vec<u8>),
    Flush(oneshot::Sender<()>),
    Stop(oneshot::Sender<()>),
}

/// Appender that ships structured events to Logstash
///
/// # Example
///
/// ```no_run
/// use logall::appenders::{LogstashAppender, LogstashConfig};
/// use logall::core::SinkContext;
/// use logall::prelude::*;
/// use logall::transport::TransportKind;
/// use std::sync::Arc;
///
/// # async fn run() -> logall::Result<()> {
/// let config = LogstashConfig::new(TransportKind::Tcp, "127.0.0.1", 5000)
///     .with_event_type(EventType::literal("app"));
/// let appender = LogstashAppender::connect(&config, &SinkContext::default()).await?;
///
/// let logger = Logger::new();
/// logger.register_appender("logstash", LogLevel::Info, Arc::new(appender));
/// logger.info("This event is sent to 127.0.0.1:5000").await;
/// # Ok(())
/// # }
/// ```
pub struct LogstashAppender {
    name: String,
    codec: StructuredCodec,
    queue: mpsc::UnboundedSender<Command>,
    notices: NoticeHandler,
    metrics: Arc<LoggerMetrics>,
}

impl LogstashAppender {
    /// Build the transport named in `config` and start the sender task
    pub async fn connect(config: &LogstashConfig, context: &SinkContext) -> Result<Self> {
        config.validate()?;

        let transport = transport::connect(
            config.output.transport,
            &config.output.host,
            config.output.port,
            Arc::clone(&context.notices),
        )
        .await?;

        let codec = StructuredCodec::new(config.event_type.clone(), config.codec)
            .with_clock(Arc::clone(&context.clock));

        Ok(Self::with_transport(transport, codec, context))
    }

    /// Start the sender task over an existing transport
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_transport(
        transport: Box<dyn Transport>,
        codec: StructuredCodec,
        context: &SinkContext,
    ) -> Self {
        let (queue, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_sender(rx, transport, Arc::clone(&context.metrics)));

        Self {
            name: "logstash".to_string(),
            codec,
            queue,
            notices: Arc::clone(&context.notices),
            metrics: Arc::clone(&context.metrics),
        }
    }

    /// Name used in notices and errors; defaults to `logstash`
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn codec(&self) -> &StructuredCodec {
        &self.codec
    }
}

async fn run_sender(
    mut rx: mpsc::UnboundedReceiver<Command>,
    transport: Box<dyn Transport>,
    metrics: Arc<LoggerMetrics>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Send(payload) => match transport.send(&payload).await {
                Ok(()) => {
                    metrics.record_sent();
                }
                // Already announced when the transport first failed
                Err(e) if e.is_degraded() => {}
                Err(_) => {
                    metrics.record_transport_fault();
                }
            },
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
            Command::Stop(ack) => {
                transport.stop().await;
                let _ = ack.send(());
                return;
            }
        }
    }

    // Every handle was dropped
    transport.stop().await;
}

#[async_trait]
impl Appender for LogstashAppender {
    fn append(&self, record: Arc<LogRecord>) {
        let payload = match self.codec.to_payload(&record) {
            Ok(payload) => payload,
            Err(e) => {
                self.metrics.record_transport_fault();
                (self.notices)(&Notice::DeliveryFailed {
                    sink: self.name().to_string(),
                    message: e.to_string(),
                });
                return;
            }
        };

        // A closed queue means the appender was stopped; drop silently
        let _ = self.queue.send(Command::Send(payload));
    }

    async fn flush(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.queue
            .send(Command::Flush(ack))
            .map_err(|_| LoggerError::appender_stopped(self.name()))?;
        done.await
            .map_err(|_| LoggerError::appender_stopped(self.name()))
    }

    async fn stop(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        if self.queue.send(Command::Stop(ack)).is_err() {
            return Ok(());
        }
        let _ = done.await;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
