//! Timestamp source for sinks that stamp records
//!
//! Sinks never read the wall clock directly. They ask an injected [`Clock`]
//! so output stays reproducible under a fixed clock.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use logall::core::TimestampFormat;
/// use chrono::Local;
///
/// let format = TimestampFormat::Rfc3339Seconds;
/// let timestamp = format.format(&Local::now());
/// assert_eq!(timestamp.len(), 25);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local time with offset, second precision: `2015-07-02T11:28:30+01:00`
    ///
    /// Default format, matches what Logstash parses out of the box.
    #[default]
    Rfc3339Seconds,

    /// Local time with offset, millisecond precision: `2015-07-02T11:28:30.123+01:00`
    Rfc3339Millis,

    /// UTC with milliseconds: `2015-07-02T10:28:30.123Z`
    Iso8601Utc,

    /// Custom strftime format, applied to local time
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::Rfc3339Seconds => datetime.to_rfc3339_opts(SecondsFormat::Secs, false),
            TimestampFormat::Rfc3339Millis => {
                datetime.to_rfc3339_opts(SecondsFormat::Millis, false)
            }
            TimestampFormat::Iso8601Utc => datetime
                .with_timezone(&Utc)
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

/// Source of ISO-8601 timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> String;
}

/// Shared clock handle
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock in the local timezone
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    format: TimestampFormat,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_format(format: TimestampFormat) -> Self {
        Self { format }
    }

    /// Shared handle to a default system clock
    pub fn shared() -> SharedClock {
        Arc::new(Self::default())
    }
}

impl Clock for SystemClock {
    fn now(&self) -> String {
        self.format.format(&Local::now())
    }
}

/// Clock that always reports the same string
#[derive(Debug, Clone, Default)]
pub struct FixedClock(String);

impl FixedClock {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self(timestamp.into())
    }

    pub fn shared(timestamp: impl Into<String>) -> SharedClock {
        Arc::new(Self::new(timestamp))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}
