//! Appender trait for log delivery targets

use super::{error::Result, record::LogRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// A delivery target behind a registered sink
///
/// `append` starts delivery and returns without waiting for it to finish.
/// Appenders that do I/O hand the record to their own task; the
/// dispatcher never awaits them.
///
/// # Example
///
/// ```
/// use logall::core::{Appender, LogRecord};
/// use std::sync::Arc;
///
/// struct StdoutAppender;
///
/// impl Appender for StdoutAppender {
///     fn append(&self, record: Arc<LogRecord>) {
///         println!("{} {}", record.level, record.message);
///     }
///
///     fn name(&self) -> &str {
///         "stdout"
///     }
/// }
/// ```
#[async_trait]
pub trait Appender: Send + Sync {
    /// Start delivering one record
    fn append(&self, record: Arc<LogRecord>);

    /// Wait until every record appended so far has been handed off
    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Release the appender's resources
    ///
    /// Safe to call more than once.
    async fn stop(&self) -> Result<()> {
        Ok(())
    }

    /// Appender kind, used in diagnostics
    fn name(&self) -> &str;
}
