//! Event type resolution
//!
//! A Logstash event type is either one fixed string or a prefix followed by
//! the lower-case level name, with optional per-level replacements.

use crate::core::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the `type` of a structured event is chosen
///
/// In JSON configuration this is either a string or an object:
///
/// ```
/// use logall::codec::EventType;
/// use logall::core::LogLevel;
///
/// let fixed: EventType = serde_json::from_str(r#""app""#).unwrap();
/// assert_eq!(fixed.resolve(LogLevel::Error), "app");
///
/// let by_level: EventType =
///     serde_json::from_str(r#"{"prefix": "app_", "overrides": {"error": "errors"}}"#).unwrap();
/// assert_eq!(by_level.resolve(LogLevel::Info), "app_info");
/// assert_eq!(by_level.resolve(LogLevel::Error), "app_errors");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventType {
    /// Same type for every level; the event also carries a `level` field
    Literal(String),

    /// `prefix` + override for the level, or the lower-case level name
    ByLevel {
        #[serde(default)]
        prefix: String,
        /// Keyed by lower-case level name
        #[serde(default)]
        overrides: HashMap<String, String>,
    },
}

impl EventType {
    pub fn literal(name: impl Into<String>) -> Self {
        EventType::Literal(name.into())
    }

    pub fn by_level(prefix: impl Into<String>) -> Self {
        EventType::ByLevel {
            prefix: prefix.into(),
            overrides: HashMap::new(),
        }
    }

    /// Add a per-level suffix override (only meaningful for `ByLevel`)
    #[must_use]
    pub fn with_override(mut self, level: LogLevel, suffix: impl Into<String>) -> Self {
        if let EventType::ByLevel { overrides, .. } = &mut self {
            overrides.insert(level.to_lowercase_str().to_string(), suffix.into());
        }
        self
    }

    /// Type string for an event at `level`
    pub fn resolve(&self, level: LogLevel) -> String {
        match self {
            EventType::Literal(name) => name.clone(),
            EventType::ByLevel { prefix, overrides } => {
                let key = level.to_lowercase_str();
                let suffix = overrides.get(key).map(String::as_str).unwrap_or(key);
                format!("{}{}", prefix, suffix)
            }
        }
    }

    /// Whether events should carry an explicit `level` field
    pub fn stamps_level(&self) -> bool {
        matches!(self, EventType::Literal(_))
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::by_level("")
    }
}
