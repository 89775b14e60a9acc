//! Logstash-style structured encoding
//!
//! Two field conventions are supported:
//!
//! * [`CodecKind::Default`]: `@timestamp`, `type`, `module` and `message` at
//!   the top level next to the record's data fields. A data field that
//!   collides with one of those names is copied under `additional<Name>`
//!   (`@timestamp` becomes `additionalTimestamp`) and the top-level value
//!   wins.
//! * [`CodecKind::Legacy`]: the older `@timestamp`, `@type`, `@message`,
//!   `@fields` layout with the module stored inside `@fields`.

use super::event_type::EventType;
use crate::core::log_data::is_truthy;
use crate::core::{LogRecord, Result, SharedClock, SystemClock};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level names of the default layout, in output order
const BASE_KEYS: [&str; 4] = ["@timestamp", "type", "module", "message"];

/// Field naming convention
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    #[default]
    Default,
    #[serde(alias = "oldlogstashjson")]
    Legacy,
}

/// Name a colliding data field is copied under
pub fn additional_key(key: &str) -> String {
    if key == "@timestamp" {
        return "additionalTimestamp".to_string();
    }

    let mut chars = key.chars();
    match chars.next() {
        Some(first) => format!("additional{}{}", first.to_uppercase(), chars.as_str()),
        None => "additional".to_string(),
    }
}

/// Turns records into wire-ready JSON objects
#[derive(Clone)]
pub struct StructuredCodec {
    event_type: EventType,
    kind: CodecKind,
    clock: SharedClock,
}

impl StructuredCodec {
    pub fn new(event_type: EventType, kind: CodecKind) -> Self {
        Self {
            event_type,
            kind,
            clock: SystemClock::shared(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn kind(&self) -> CodecKind {
        self.kind
    }

    /// Encode `record`, stamped with the codec's clock
    pub fn encode(&self, record: &LogRecord) -> Value {
        self.encode_at(record, self.clock.now())
    }

    /// Encode `record` with an explicit timestamp
    pub fn encode_at(&self, record: &LogRecord, timestamp: String) -> Value {
        let event_type = self.event_type.resolve(record.level);

        match self.kind {
            CodecKind::Default => {
                let mut event = default_layout(record, timestamp, event_type);
                if self.event_type.stamps_level() {
                    event.insert("level".to_string(), Value::from(record.level.to_str()));
                }
                Value::Object(event)
            }
            CodecKind::Legacy => legacy_layout(record, timestamp, event_type),
        }
    }

    /// Encode and serialize `record` as one JSON payload
    pub fn to_payload(&self, record: &LogRecord) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.encode(record))?)
    }
}

fn default_layout(record: &LogRecord, timestamp: String, event_type: String) -> Map<String, Value> {
    let mut event = Map::new();
    event.insert("@timestamp".to_string(), Value::String(timestamp));
    event.insert("type".to_string(), Value::String(event_type));
    if let Some(module) = &record.module {
        event.insert("module".to_string(), Value::String(module.clone()));
    }
    event.insert("message".to_string(), Value::String(record.message.clone()));

    let Some(data) = &record.data else {
        return event;
    };

    let mut remapped = data.as_map().clone();
    for key in BASE_KEYS {
        if let Some(value) = data.get(key).filter(|v| is_truthy(v)) {
            remapped.insert(additional_key(key), value.clone());
        }
    }

    // Top-level values win; an absent module leaves the data's module in place
    for (key, value) in remapped {
        if !event.contains_key(&key) {
            event.insert(key, value);
        }
    }
    event
}

fn legacy_layout(record: &LogRecord, timestamp: String, event_type: String) -> Value {
    let mut fields = record
        .data
        .as_ref()
        .map(|d| d.as_map().clone())
        .unwrap_or_default();

    match &record.module {
        Some(module) => {
            fields.insert("module".to_string(), Value::String(module.clone()));
        }
        None => {
            fields.shift_remove("module");
        }
    }

    let mut event = Map::new();
    event.insert("@timestamp".to_string(), Value::String(timestamp));
    event.insert("@type".to_string(), Value::String(event_type));
    event.insert("@message".to_string(), Value::String(record.message.clone()));
    event.insert("@fields".to_string(), Value::Object(fields));
    Value::Object(event)
}
