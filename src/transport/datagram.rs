//! One-shot UDP transport
//!
//! Every event is one self-contained datagram. No connection, no
//! acknowledgment, no retry, and no ordering across datagrams beyond what
//! the network happens to provide.

use super::{socket_address, Transport, TransportKind};
use crate::core::{LoggerError, Notice, NoticeHandler, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::net::UdpSocket;

/// Sender that emits one UDP datagram per event
pub struct DatagramSender {
    address: String,
    socket: Mutex<Option<Arc<UdpSocket>>>,
    notices: NoticeHandler,
}

impl DatagramSender {
    /// Bind a local socket on an ephemeral port for sending to `host:port`
    pub async fn bind(host: &str, port: u16, notices: NoticeHandler) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| LoggerError::io_operation("binding", "udp socket", e))?;

        Ok(Self {
            address: socket_address(host, port),
            socket: Mutex::new(Some(Arc::new(socket))),
            notices,
        })
    }
}

#[async_trait]
impl Transport for DatagramSender {
    async fn send(&self, payload: &[u8]) -> Result<()> {
        let socket = self
            .socket
            .lock()
            .clone()
            .ok_or_else(|| LoggerError::transport_stopped(TransportKind::Udp, &self.address))?;

        match socket.send_to(payload, self.address.as_str()).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let err = LoggerError::io_operation("sending datagram", self.address.clone(), e);
                (self.notices)(&Notice::TransportFault {
                    transport: TransportKind::Udp,
                    address: self.address.clone(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn stop(&self) {
        self.socket.lock().take();
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Udp
    }

    fn address(&self) -> &str {
        &self.address
    }
}
