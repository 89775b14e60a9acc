//! Network transports for structured sinks
//!
//! Two interchangeable senders: [`StreamSender`] keeps one TCP connection
//! for its whole life, [`DatagramSender`] sends one UDP datagram per event.
//! Neither retries, buffers or acknowledges. Payloads go out exactly as
//! given, with no length prefix or delimiter between events.

pub mod datagram;
pub mod stream;

pub use datagram::DatagramSender;
pub use stream::StreamSender;

use crate::core::{LoggerError, NoticeHandler, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported transports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransportKind {
    Tcp,
    Udp,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Tcp => "tcp",
            TransportKind::Udp => "udp",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = LoggerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tcp" => Ok(TransportKind::Tcp),
            "udp" => Ok(TransportKind::Udp),
            _ => Err(LoggerError::unknown_transport(s)),
        }
    }
}

impl TryFrom<String> for TransportKind {
    type Error = LoggerError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransportKind> for String {
    fn from(kind: TransportKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Delivery mechanism for serialized events
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one serialized event
    ///
    /// Failures are also reported through the sender's notice handler.
    async fn send(&self, payload: &[u8]) -> Result<()>;

    /// Release the underlying socket; later sends fail
    async fn stop(&self);

    fn kind(&self) -> TransportKind;

    /// `host:port` the transport sends to
    fn address(&self) -> &str;
}

/// Format `host` and `port` as a socket address string
pub fn socket_address(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

/// Build the sender for `kind`
///
/// A TCP sender whose connection fails is still returned, degraded; only
/// local setup failures (such as binding the UDP socket) are errors.
pub async fn connect(
    kind: TransportKind,
    host: &str,
    port: u16,
    notices: NoticeHandler,
) -> Result<Box<dyn Transport>> {
    match kind {
        TransportKind::Tcp => Ok(Box::new(StreamSender::connect(host, port, notices).await)),
        TransportKind::Udp => Ok(Box::new(DatagramSender::bind(host, port, notices).await?)),
    }
}
