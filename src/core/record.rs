//! Log record structure

use super::log_data::LogData;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// One leveled log event
///
/// A record is built fresh by every dispatch, moved by value through the
/// mutation pipeline, and frozen behind an `Arc` once fan-out begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<LogData>,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            module: None,
            message: message.into(),
            data: None,
        }
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: LogData) -> Self {
        self.data = Some(data);
        self
    }

    /// Mutable access to the data map, creating it when absent
    pub fn data_mut(&mut self) -> &mut LogData {
        self.data.get_or_insert_with(LogData::new)
    }

    /// Look up one data field
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.as_ref().and_then(|d| d.get(key))
    }
}
