//! Out-of-band diagnostics
//!
//! Sink and transport failures never reach the caller of `log()`. They are
//! reported here instead, through a handler the application may replace.

use crate::transport::TransportKind;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Something a sink wants an operator to know about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A stream transport established its connection
    Connected {
        transport: TransportKind,
        address: String,
    },

    /// A transport failed; stream transports stay degraded afterwards
    TransportFault {
        transport: TransportKind,
        address: String,
        message: String,
    },

    /// A sink could not encode or hand off one record
    DeliveryFailed { sink: String, message: String },

    /// A mutation step panicked; its record was dropped
    StepPanicked { step: usize, message: String },
}

impl Notice {
    /// Whether the notice reports a failure
    pub fn is_fault(&self) -> bool {
        !matches!(self, Notice::Connected { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Connected { transport, address } => {
                write!(f, "{} transport connected to {}", transport, address)
            }
            Notice::TransportFault {
                transport,
                address,
                message,
            } => write!(f, "{} client error ({}): {}", transport, address, message),
            Notice::DeliveryFailed { sink, message } => {
                write!(f, "sink '{}' failed to deliver: {}", sink, message)
            }
            Notice::StepPanicked { step, message } => {
                write!(f, "mutation step #{} panicked: {}", step, message)
            }
        }
    }
}

/// Text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Callback invoked for every notice
///
/// # Example
///
/// ```
/// use logall::core::{Notice, NoticeHandler};
/// use std::sync::Arc;
///
/// let handler: NoticeHandler = Arc::new(|notice: &Notice| {
///     if notice.is_fault() {
///         eprintln!("logging degraded: {}", notice);
///     }
/// });
/// ```
pub type NoticeHandler = Arc<dyn Fn(&Notice) + Send + Sync>;

/// Handler that writes notices to stderr
pub fn stderr_handler() -> NoticeHandler {
    Arc::new(|notice: &Notice| {
        if notice.is_fault() {
            eprintln!("[LOGGER ERROR] {}", notice);
        } else {
            eprintln!("[LOGGER INFO] {}", notice);
        }
    })
}

/// Handler that discards every notice
pub fn silent_handler() -> NoticeHandler {
    Arc::new(|_: &Notice| {})
}
