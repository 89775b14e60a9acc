//! Persistent TCP transport
//!
//! Connects once at construction and keeps the connection for the sink's
//! lifetime. Each event is written straight onto the byte stream with no
//! delimiter, so a receiver reading a continuous stream has to find event
//! boundaries itself.
//!
//! There is no reconnect. The first connect or write failure is reported
//! as a notice and the sender stays degraded for the rest of the process.

use super::{socket_address, Transport, TransportKind};
use crate::core::{LoggerError, Notice, NoticeHandler, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Timeout for establishing the connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for writing one event
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

enum StreamState {
    Open(TcpStream),
    Degraded,
    Stopped,
}

/// Sender that writes every event to one long-lived TCP connection
pub struct StreamSender {
    address: String,
    state: Mutex<StreamState>,
    notices: NoticeHandler,
}

impl StreamSender {
    /// Connect to `host:port`
    ///
    /// Never fails: an unreachable server yields a degraded sender and a
    /// `TransportFault` notice.
    pub async fn connect(host: &str, port: u16, notices: NoticeHandler) -> Self {
        let address = socket_address(host, port);

        let state = match open(&address).await {
            Ok(stream) => {
                notices(&Notice::Connected {
                    transport: TransportKind::Tcp,
                    address: address.clone(),
                });
                StreamState::Open(stream)
            }
            Err(e) => {
                report_fault(&notices, &address, &e);
                StreamState::Degraded
            }
        };

        Self {
            address,
            state: Mutex::new(state),
            notices,
        }
    }

    /// Whether the connection is still usable
    pub async fn is_connected(&self) -> bool {
        matches!(*self.state.lock().await, StreamState::Open(_))
    }
}

async fn open(address: &str) -> Result<TcpStream> {
    let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(address))
        .await
        .map_err(|_| LoggerError::other(format!("connect timed out after {:?}", CONNECT_TIMEOUT)))?
        .map_err(|e| LoggerError::io_operation("connecting", address.to_string(), e))?;

    // Events are small and latency matters more than packet count
    stream.set_nodelay(true)?;
    Ok(stream)
}

fn report_fault(notices: &NoticeHandler, address: &str, error: &LoggerError) {
    notices(&Notice::TransportFault {
        transport: TransportKind::Tcp,
        address: address.to_string(),
        message: error.to_string(),
    });
}

#[async_trait]
impl Transport for StreamSender {
    async fn send(&self, payload: &[u8]) -> Result<()> {
        let mut state = self.state.lock().await;

        let result = match &mut *state {
            StreamState::Open(stream) => {
                match tokio::time::timeout(WRITE_TIMEOUT, stream.write_all(payload)).await {
                    Ok(Ok(())) => return Ok(()),
                    Ok(Err(e)) => LoggerError::io_operation("writing event", self.address.clone(), e),
                    Err(_) => LoggerError::other(format!("write timed out after {:?}", WRITE_TIMEOUT)),
                }
            }
            StreamState::Degraded => {
                return Err(LoggerError::transport_degraded(TransportKind::Tcp, &self.address))
            }
            StreamState::Stopped => {
                return Err(LoggerError::transport_stopped(TransportKind::Tcp, &self.address))
            }
        };

        *state = StreamState::Degraded;
        report_fault(&self.notices, &self.address, &result);
        Err(result)
    }

    async fn stop(&self) {
        let mut state = self.state.lock().await;
        if let StreamState::Open(stream) = &mut *state {
            let _ = stream.shutdown().await;
        }
        *state = StreamState::Stopped;
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Tcp
    }

    fn address(&self) -> &str {
        &self.address
    }
}
