//! Closure-backed appender
//!
//! Lets an application supply its own delivery function when registering a
//! sink, without writing an `Appender` impl.

use crate::core::{Appender, LogRecord};
use std::sync::Arc;

type DeliverFn = dyn Fn(Arc<LogRecord>) + Send + Sync;

/// Appender that hands every record to a closure
///
/// # Example
///
/// ```
/// use logall::appenders::CallbackAppender;
/// use logall::prelude::*;
/// use std::sync::Arc;
///
/// let appender = CallbackAppender::new(|record| {
///     println!("got {}", record.message);
/// });
///
/// let logger = Logger::builder().build();
/// logger.register_appender("custom", LogLevel::Info, Arc::new(appender));
/// ```
pub struct CallbackAppender {
    deliver: Box<DeliverFn>,
}

impl CallbackAppender {
    pub fn new<F>(deliver: F) -> Self
    where
        F: Fn(Arc<LogRecord>) + Send + Sync + 'static,
    {
        Self {
            deliver: Box::new(deliver),
        }
    }
}

impl Appender for CallbackAppender {
    fn append(&self, record: Arc<LogRecord>) {
        (self.deliver)(record);
    }

    fn name(&self) -> &str {
        "callback"
    }
}
