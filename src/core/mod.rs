//! Core logger types and traits

pub mod appender;
pub mod clock;
pub mod config;
pub mod error;
pub mod log_data;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod module_logger;
pub mod notice;
pub mod pipeline;
pub mod record;
pub mod registry;

pub use appender::Appender;
pub use clock::{Clock, FixedClock, SharedClock, SystemClock, TimestampFormat};
pub use config::{ConsoleConfig, LoggingConfig, SinkConfig, SinkContext, SinkKind};
pub use error::{LoggerError, Result};
pub use log_data::LogData;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_SINK_NAME};
pub use metrics::LoggerMetrics;
pub use module_logger::ModuleLogger;
pub use notice::{Notice, NoticeHandler};
pub use pipeline::{MutationPipeline, MutationStep, SyncStep};
pub use record::LogRecord;
pub use registry::{Sink, SinkRegistry, Threshold};
