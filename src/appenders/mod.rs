//! Appender implementations

pub mod callback;
pub mod console;
pub mod logstash;

pub use callback::CallbackAppender;
pub use console::ConsoleAppender;
pub use logstash::{LogstashAppender, LogstashConfig, OutputConfig};

// Re-export the trait next to its implementations
pub use crate::core::Appender;
