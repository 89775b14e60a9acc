//! Error types for the logging facade

use crate::transport::TransportKind;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A level name outside the declared level table
    #[error("Unknown log level: '{0}'")]
    UnknownLevel(String),

    /// A transport name outside the supported set
    #[error("Unknown transport: '{0}' (expected 'tcp' or 'udp')")]
    UnknownTransport(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// The stream transport lost its connection and will not reconnect
    #[error("{transport} transport to {address} is degraded")]
    TransportDegraded {
        transport: TransportKind,
        address: String,
    },

    /// The transport was stopped before the send
    #[error("{transport} transport to {address} has been stopped")]
    TransportStopped {
        transport: TransportKind,
        address: String,
    },

    /// The appender's worker is no longer accepting records
    #[error("Appender '{0}' has been stopped")]
    AppenderStopped(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an unknown level error
    pub fn unknown_level(name: impl Into<String>) -> Self {
        LoggerError::UnknownLevel(name.into())
    }

    /// Create an unknown transport error
    pub fn unknown_transport(name: impl Into<String>) -> Self {
        LoggerError::UnknownTransport(name.into())
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn transport_degraded(transport: TransportKind, address: impl Into<String>) -> Self {
        LoggerError::TransportDegraded {
            transport,
            address: address.into(),
        }
    }

    pub fn transport_stopped(transport: TransportKind, address: impl Into<String>) -> Self {
        LoggerError::TransportStopped {
            transport,
            address: address.into(),
        }
    }

    /// Create an appender stopped error
    pub fn appender_stopped(name: impl Into<String>) -> Self {
        LoggerError::AppenderStopped(name.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error only reports a sink that already faulted
    ///
    /// Such errors are not re-announced as notices.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            LoggerError::TransportDegraded { .. } | LoggerError::TransportStopped { .. }
        )
    }
}
