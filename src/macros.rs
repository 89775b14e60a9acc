//! Logging macros for ergonomic log message formatting.
//!
//! Each macro formats its arguments like `format!` and expands to the
//! dispatch future, which the caller awaits.
//!
//! # Examples
//!
//! ```
//! use logall::prelude::*;
//! use logall::info;
//!
//! # tokio_test::block_on(async {
//! let logger = Logger::new();
//!
//! info!(logger, "Server started").await;
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).await;
//! # });
//! ```

/// Log a message at any level with automatic formatting.
///
/// # Examples
///
/// ```
/// # use logall::prelude::*;
/// use logall::log;
/// # tokio_test::block_on(async {
/// # let logger = Logger::new();
/// log!(logger, LogLevel::Info, "Simple message").await;
/// log!(logger, LogLevel::Error, "Error code: {}", 500).await;
/// # });
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, None, format!($($arg)+), None)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use logall::prelude::*;
/// use logall::debug;
/// # tokio_test::block_on(async {
/// # let logger = Logger::new();
/// debug!(logger, "Counter value: {}", 10).await;
/// # });
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use logall::prelude::*;
/// use logall::warn;
/// # tokio_test::block_on(async {
/// # let logger = Logger::new();
/// warn!(logger, "Retry attempt {} of {}", 3, 5).await;
/// # });
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
