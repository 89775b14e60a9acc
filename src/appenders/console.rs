//! Console appender implementation
//!
//! Line format: `[<timestamp>] [<LEVEL>] [<module>] <message>, k1: v1, k2: v2`.
//! The module segment is left out when the record has no module, and data
//! fields with falsy values are left out together with their key.

use crate::core::{Appender, LogLevel, LogRecord, SharedClock, SystemClock};
use std::sync::Arc;

#[cfg(feature = "console")]
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    clock: SharedClock,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: false,
            clock: SystemClock::shared(),
        }
    }

    /// Colorize the level segment when writing to a terminal
    ///
    /// [`render`](Self::render) is unaffected and always returns the plain line.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Use a specific clock for the timestamp segment
    ///
    /// # Example
    ///
    /// ```
    /// use logall::appenders::ConsoleAppender;
    /// use logall::core::{FixedClock, LogLevel, LogRecord};
    ///
    /// let appender = ConsoleAppender::new().with_clock(FixedClock::shared(""));
    /// let line = appender.render(&LogRecord::new(LogLevel::Info, "TEST MESSAGE"));
    /// assert_eq!(line, "[] [INFO] TEST MESSAGE");
    /// ```
    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Format a record as one plain-text line
    pub fn render(&self, record: &LogRecord) -> String {
        self.format_line(record, record.level.to_str())
    }

    /// Print a rendered line; ERROR goes to stderr, everything else to stdout
    pub fn write(&self, level: LogLevel, line: &str) {
        match level {
            LogLevel::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }

    fn format_line(&self, record: &LogRecord, level: &str) -> String {
        let module = match record.module.as_deref() {
            Some(m) if !m.is_empty() => format!(" [{}]", m),
            _ => String::new(),
        };

        format!(
            "[{}] [{}]{} {}{}",
            self.clock.now(),
            level,
            module,
            record.message,
            data_suffix(record)
        )
    }

    #[cfg(feature = "console")]
    fn render_colored(&self, record: &LogRecord) -> String {
        let level = record
            .level
            .to_str()
            .color(record.level.color_code())
            .to_string();
        self.format_line(record, &level)
    }

    #[cfg(not(feature = "console"))]
    fn render_colored(&self, record: &LogRecord) -> String {
        self.render(record)
    }
}

fn data_suffix(record: &LogRecord) -> String {
    match record.data.as_ref().map(|d| d.format_fields()) {
        Some(fields) if !fields.is_empty() => format!(", {}", fields),
        _ => String::new(),
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&self, record: Arc<LogRecord>) {
        let line = if self.use_colors {
            self.render_colored(&record)
        } else {
            self.render(&record)
        };
        self.write(record.level, &line);
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FixedClock, LogData};

    fn appender() -> ConsoleAppender {
        ConsoleAppender::new().with_clock(FixedClock::shared(""))
    }

    #[test]
    fn test_logs_current_time() {
        let appender =
            ConsoleAppender::new().with_clock(FixedClock::shared("2015-07-02T11:28:30+01:00"));
        let line = appender.render(&LogRecord::new(LogLevel::Info, "TEST MESSAGE"));
        assert_eq!(&line[..27], "[2015-07-02T11:28:30+01:00]");
    }

    #[test]
    fn test_logs_level_and_message() {
        let line = appender().render(&LogRecord::new(LogLevel::Info, "TEST MESSAGE"));
        assert_eq!(line, "[] [INFO] TEST MESSAGE");
    }

    #[test]
    fn test_logs_module_if_present() {
        let record = LogRecord::new(LogLevel::Info, "TEST MESSAGE").with_module("TEST MODULE");
        assert_eq!(
            appender().render(&record),
            "[] [INFO] [TEST MODULE] TEST MESSAGE"
        );
    }

    #[test]
    fn test_logs_data_if_present() {
        let record = LogRecord::new(LogLevel::Info, "TEST MESSAGE")
            .with_module("TEST MODULE")
            .with_data(LogData::new().with_field("a", 1).with_field("b", 2));
        assert_eq!(
            appender().render(&record),
            "[] [INFO] [TEST MODULE] TEST MESSAGE, a: 1, b: 2"
        );
    }

    #[test]
    fn test_falsy_data_is_omitted() {
        let record = LogRecord::new(LogLevel::Error, "boom").with_data(
            LogData::new()
                .with_field("a", 0)
                .with_field("b", "x")
                .with_field("c", false),
        );
        assert_eq!(appender().render(&record), "[] [ERROR] boom, b: x");
    }

    #[test]
    fn test_all_falsy_data_leaves_no_suffix() {
        let record = LogRecord::new(LogLevel::Debug, "quiet")
            .with_data(LogData::new().with_field("a", "").with_field("b", serde_json::Value::Null));
        assert_eq!(appender().render(&record), "[] [DEBUG] quiet");
    }
}
