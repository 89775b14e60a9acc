//! Sink configuration and the sink factory
//!
//! Sink kinds form a closed set. Anything else is rejected when the
//! configuration is parsed, not when the first record is logged.
//!
//! ```
//! use logall::core::LoggingConfig;
//!
//! let config = LoggingConfig::from_json(r#"{
//!     "sinks": [
//!         { "name": "default", "type": "console", "level": "INFO" },
//!         { "name": "logstash", "type": "logstash", "level": "DEBUG",
//!           "output": { "transport": "udp", "host": "127.0.0.1", "port": 9990 },
//!           "eventType": "app" }
//!     ]
//! }"#).unwrap();
//! assert_eq!(config.sinks.len(), 2);
//! ```

use super::{
    appender::Appender,
    clock::{SharedClock, SystemClock},
    error::Result,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    notice::{stderr_handler, NoticeHandler},
    registry::Sink,
};
use crate::appenders::{ConsoleAppender, LogstashAppender, LogstashConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Collaborators handed to every sink a logger builds
#[derive(Clone)]
pub struct SinkContext {
    pub notices: NoticeHandler,
    pub clock: SharedClock,
    pub metrics: Arc<LoggerMetrics>,
}

impl SinkContext {
    #[must_use]
    pub fn with_notices(mut self, notices: NoticeHandler) -> Self {
        self.notices = notices;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<LoggerMetrics>) -> Self {
        self.metrics = metrics;
        self
    }
}

impl Default for SinkContext {
    fn default() -> Self {
        Self {
            notices: stderr_handler(),
            clock: SystemClock::shared(),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }
}

/// Console sink options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub colors: bool,
}

/// Sink implementation, selected by the `type` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SinkKind {
    Console(ConsoleConfig),
    Logstash(LogstashConfig),
}

/// One sink entry of a logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    #[serde(default = "default_sink_name")]
    pub name: String,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(flatten)]
    pub kind: SinkKind,
}

fn default_sink_name() -> String {
    "default".to_string()
}

impl SinkConfig {
    pub fn console(name: impl Into<String>, level: LogLevel) -> Self {
        Self {
            name: name.into(),
            level,
            kind: SinkKind::Console(ConsoleConfig::default()),
        }
    }

    pub fn logstash(name: impl Into<String>, level: LogLevel, config: LogstashConfig) -> Self {
        Self {
            name: name.into(),
            level,
            kind: SinkKind::Logstash(config),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match &self.kind {
            SinkKind::Console(_) => Ok(()),
            SinkKind::Logstash(config) => config.validate(),
        }
    }

    /// Construct the sink this entry describes
    pub async fn build(&self, context: &SinkContext) -> Result<Sink> {
        let appender: Arc<dyn Appender> = match &self.kind {
            SinkKind::Console(console) => Arc::new(
                ConsoleAppender::new()
                    .with_colors(console.colors)
                    .with_clock(Arc::clone(&context.clock)),
            ),
            SinkKind::Logstash(logstash) => {
                Arc::new(
                    LogstashAppender::connect(logstash, context)
                        .await?
                        .with_name(self.name.clone()),
                )
            }
        };

        Ok(Sink::new(self.name.clone(), self.level, appender))
    }
}

/// A full logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

impl LoggingConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.sinks.iter().try_for_each(SinkConfig::validate)
    }
}
