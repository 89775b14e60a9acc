//! # logall
//!
//! A leveled logging facade: application code emits each event once and
//! the logger fans it out to any number of independently configured sinks,
//! each with its own severity threshold and output format.
//!
//! ## Features
//!
//! - **Fan-out**: Console, Logstash (TCP or UDP) and custom sinks side by side
//! - **Mutation pipeline**: Ordered async steps that enrich every record
//! - **Dynamic thresholds**: Per-sink levels computed from the record itself
//! - **Fire-and-forget**: Logging never waits on, or fails because of, a sink
//!
//! ```
//! use logall::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let logger = Logger::new();
//! logger.register_fn_step(|record: &mut LogRecord| {
//!     record.data_mut().insert("service", "checkout");
//! });
//!
//! logger.info("order placed").await;
//! logger
//!     .for_module("payments")
//!     .error_with("card declined", LogData::new().with_field("code", 51))
//!     .await;
//! # });
//! ```

pub mod appenders;
pub mod codec;
pub mod core;
pub mod macros;
pub mod transport;

pub mod prelude {
    pub use crate::appenders::{CallbackAppender, ConsoleAppender, LogstashAppender, LogstashConfig};
    pub use crate::codec::{CodecKind, EventType};
    pub use crate::core::{
        Appender, LogData, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, LoggingConfig, ModuleLogger, MutationStep, Notice, Result, Sink,
        SinkConfig, Threshold,
    };
    pub use crate::transport::TransportKind;
}

pub use crate::appenders::{CallbackAppender, ConsoleAppender, LogstashAppender, LogstashConfig};
pub use crate::codec::{CodecKind, EventType, StructuredCodec};
pub use crate::core::{
    Appender, Clock, LogData, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, LoggingConfig, ModuleLogger, MutationStep, Notice, NoticeHandler, Result,
    Sink, SinkConfig, SinkContext, SinkRegistry, SyncStep, Threshold, DEFAULT_SINK_NAME,
};
pub use crate::transport::{Transport, TransportKind};
