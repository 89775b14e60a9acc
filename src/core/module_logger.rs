//! Module-bound logger

use super::{log_data::LogData, log_level::LogLevel, logger::Logger};

/// Logger whose records all carry the same module tag
///
/// Obtained from [`Logger::for_module`]. Holds nothing but the logger
/// handle and the module name; every method forwards to [`Logger::log`].
///
/// # Example
///
/// ```
/// use logall::prelude::*;
///
/// # tokio_test::block_on(async {
/// let logger = Logger::new();
/// let db = logger.for_module("database");
/// db.info("connection pool ready").await;
/// # });
/// ```
#[derive(Clone)]
pub struct ModuleLogger {
    logger: Logger,
    module: String,
}

impl ModuleLogger {
    pub(crate) fn new(logger: Logger, module: impl Into<String>) -> Self {
        Self {
            logger,
            module: module.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub async fn log(&self, level: LogLevel, message: impl Into<String>, data: Option<LogData>) {
        self.logger
            .log(level, Some(&self.module), message, data)
            .await;
    }

    pub async fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message, None).await;
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message, None).await;
    }

    pub async fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message, None).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message, None).await;
    }

    pub async fn debug_with(&self, message: impl Into<String>, data: LogData) {
        self.log(LogLevel::Debug, message, Some(data)).await;
    }

    pub async fn info_with(&self, message: impl Into<String>, data: LogData) {
        self.log(LogLevel::Info, message, Some(data)).await;
    }

    pub async fn warn_with(&self, message: impl Into<String>, data: LogData) {
        self.log(LogLevel::Warn, message, Some(data)).await;
    }

    pub async fn error_with(&self, message: impl Into<String>, data: LogData) {
        self.log(LogLevel::Error, message, Some(data)).await;
    }
}
