//! Logger: the dispatch entry point
//!
//! `log()` builds a record, runs it through the mutation pipeline, then
//! starts delivery on every sink whose threshold the record meets, in
//! registration order. Delivery is never awaited, and `log()` has no
//! error to report: sink failures and panicking steps go to the notice
//! handler.

use super::{
    appender::Appender,
    clock::SharedClock,
    config::{LoggingConfig, SinkConfig, SinkContext},
    error::{LoggerError, Result},
    log_data::LogData,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    module_logger::ModuleLogger,
    notice::{panic_message, Notice, NoticeHandler},
    pipeline::{self, MutationPipeline, MutationStep, SyncStep},
    record::LogRecord,
    registry::{Sink, SinkRegistry, Threshold},
};
use crate::appenders::ConsoleAppender;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Name of the console sink a new logger starts with
pub const DEFAULT_SINK_NAME: &str = "default";

struct Shared {
    registry: SinkRegistry,
    pipeline: MutationPipeline,
    context: SinkContext,
}

/// Handle to a sink registry and mutation pipeline
///
/// Clones share the same registry and pipeline.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Shared>,
}

impl Logger {
    /// Logger with one console sink named `"default"` at INFO
    #[must_use]
    pub fn new() -> Self {
        Self::builder().default_sink().build()
    }

    /// Build a logger from a configuration; no default sink is added
    pub async fn from_config(config: &LoggingConfig) -> Result<Self> {
        config.validate()?;

        let logger = Self::builder().build();
        for sink in &config.sinks {
            logger.register_config(sink).await?;
        }
        Ok(logger)
    }

    fn from_parts(sinks: Vec<Sink>, steps: Vec<Arc<dyn MutationStep>>, context: SinkContext) -> Self {
        let registry = SinkRegistry::new();
        for sink in sinks {
            registry.register(sink);
        }

        let pipeline = MutationPipeline::new();
        for step in steps {
            pipeline.register_shared(step);
        }

        Self {
            inner: Arc::new(Shared {
                registry,
                pipeline,
                context,
            }),
        }
    }

    /// Register a sink at the end of the registry
    pub fn register(&self, sink: Sink) {
        self.inner.registry.register(sink);
    }

    /// Register a custom delivery function as a sink
    pub fn register_appender(
        &self,
        name: impl Into<String>,
        threshold: impl Into<Threshold>,
        appender: Arc<dyn Appender>,
    ) {
        self.register(Sink::new(name, threshold, appender));
    }

    /// Build and register the sink described by `config`
    pub async fn register_config(&self, config: &SinkConfig) -> Result<()> {
        let sink = config.build(&self.inner.context).await?;
        self.register(sink);
        Ok(())
    }

    /// Append a mutation step; it runs after every step registered before it
    pub fn register_step<S: MutationStep + 'static>(&self, step: S) {
        self.inner.pipeline.register(step);
    }

    /// Append a synchronous mutation step
    ///
    /// ```
    /// use logall::prelude::*;
    ///
    /// let logger = Logger::new();
    /// logger.register_fn_step(|record: &mut LogRecord| {
    ///     record.data_mut().insert("service", "checkout");
    /// });
    /// ```
    pub fn register_fn_step<F>(&self, step: F)
    where
        F: Fn(&mut LogRecord) + Send + Sync + 'static,
    {
        self.inner.pipeline.register(SyncStep::new(step));
    }

    /// Remove every sink and every mutation step
    ///
    /// This is a full reset: the default console sink is removed too, and
    /// records logged afterwards reach nothing until sinks are registered
    /// again. Records already in flight keep the sinks they started with.
    pub fn remove_all(&self) {
        self.inner.registry.clear();
        self.inner.pipeline.clear();
    }

    /// Replace the threshold of the first sink named `name`
    ///
    /// Unknown names are ignored; the return value says whether a sink
    /// matched.
    pub fn set_threshold(&self, name: &str, threshold: impl Into<Threshold>) -> bool {
        self.inner.registry.set_threshold(name, threshold)
    }

    /// Logger whose records all carry `module`
    pub fn for_module(&self, module: impl Into<String>) -> ModuleLogger {
        ModuleLogger::new(self.clone(), module)
    }

    /// Dispatch one record
    ///
    /// Resolves once the pipeline has finished and delivery has been
    /// started on every qualifying sink. If a mutation step never
    /// completes, neither does this future.
    pub async fn log(
        &self,
        level: LogLevel,
        module: Option<&str>,
        message: impl Into<String>,
        data: Option<LogData>,
    ) {
        let record = LogRecord {
            level,
            module: module.map(str::to_string),
            message: message.into(),
            data,
        };

        // Both lists are fixed for this record before any step runs
        let steps = self.inner.pipeline.snapshot();
        let sinks = self.inner.registry.snapshot();

        match pipeline::run(steps, record).await {
            Ok(record) => self.fan_out(&sinks, Arc::new(record)),
            Err(notice) => (self.inner.context.notices)(&notice),
        }
    }

    fn fan_out(&self, sinks: &[Arc<Sink>], record: Arc<LogRecord>) {
        let metrics = &self.inner.context.metrics;
        metrics.record_dispatched();

        for sink in sinks {
            // Per-sink panic isolation: a faulty threshold or appender
            // must not keep later sinks from receiving the record
            let result = catch_unwind(AssertUnwindSafe(|| {
                if sink.threshold().admits(&record) {
                    sink.appender().append(Arc::clone(&record));
                    true
                } else {
                    false
                }
            }));

            match result {
                Ok(true) => {
                    metrics.record_delivery_started();
                }
                Ok(false) => {
                    metrics.record_filtered();
                }
                Err(panic_info) => {
                    (self.inner.context.notices)(&Notice::DeliveryFailed {
                        sink: sink.name().to_string(),
                        message: format!("panicked: {}", panic_message(panic_info.as_ref())),
                    });
                }
            }
        }
    }

    #[inline]
    pub async fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, None, message, None).await;
    }

    #[inline]
    pub async fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, None, message, None).await;
    }

    #[inline]
    pub async fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, None, message, None).await;
    }

    #[inline]
    pub async fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, None, message, None).await;
    }

    /// Debug record with structured data
    pub async fn debug_with(&self, message: impl Into<String>, data: LogData) {
        self.log(LogLevel::Debug, None, message, Some(data)).await;
    }

    /// Info record with structured data
    pub async fn info_with(&self, message: impl Into<String>, data: LogData) {
        self.log(LogLevel::Info, None, message, Some(data)).await;
    }

    /// Warn record with structured data
    pub async fn warn_with(&self, message: impl Into<String>, data: LogData) {
        self.log(LogLevel::Warn, None, message, Some(data)).await;
    }

    /// Error record with structured data
    pub async fn error_with(&self, message: impl Into<String>, data: LogData) {
        self.log(LogLevel::Error, None, message, Some(data)).await;
    }

    /// Wait until every registered sink has handed off what it was given
    ///
    /// Every sink is flushed even if one fails; each failure is reported
    /// as a notice and the first error is returned.
    pub async fn flush(&self) -> Result<()> {
        let mut first_error: Option<LoggerError> = None;
        for sink in self.inner.registry.snapshot() {
            if let Err(e) = sink.appender().flush().await {
                (self.inner.context.notices)(&Notice::DeliveryFailed {
                    sink: sink.name().to_string(),
                    message: format!("flush failed: {}", e),
                });
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Flush, then stop every registered sink and release its resources
    ///
    /// Sinks stay registered; records logged afterwards are dropped by the
    /// stopped sinks.
    pub async fn shutdown(&self) -> Result<()> {
        let flushed = self.flush().await;
        for sink in self.inner.registry.snapshot() {
            if let Err(e) = sink.appender().stop().await {
                (self.inner.context.notices)(&Notice::DeliveryFailed {
                    sink: sink.name().to_string(),
                    message: format!("failed to stop: {}", e),
                });
            }
        }
        flushed
    }

    /// Names of the registered sinks, in registration order
    pub fn sink_names(&self) -> Vec<String> {
        self.inner.registry.names()
    }

    pub fn sink_count(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn step_count(&self) -> usize {
        self.inner.pipeline.len()
    }

    /// Dispatch metrics
    ///
    /// # Example
    ///
    /// ```
    /// use logall::Logger;
    ///
    /// # tokio_test::block_on(async {
    /// let logger = Logger::builder().build();
    /// logger.info("nobody is listening").await;
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.records_dispatched(), 1);
    /// assert_eq!(metrics.deliveries_started(), 0);
    /// # });
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.context.metrics
    }

    /// Collaborators shared with sinks built by this logger
    pub fn context(&self) -> &SinkContext {
        &self.inner.context
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// Unlike [`Logger::new`], a builder starts with no sinks.
///
/// # Example
/// ```
/// use logall::prelude::*;
/// use logall::appenders::CallbackAppender;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .default_sink()
///     .appender("audit", LogLevel::Warn, Arc::new(CallbackAppender::new(|_| {})))
///     .fn_step(|record: &mut LogRecord| record.message.insert_str(0, "[svc] "))
///     .on_notice(Arc::new(|notice: &Notice| eprintln!("{}", notice)))
///     .build();
///
/// assert_eq!(logger.sink_names(), vec!["default", "audit"]);
/// ```
pub struct LoggerBuilder {
    sinks: Vec<Sink>,
    steps: Vec<Arc<dyn MutationStep>>,
    context: SinkContext,
    default_sink: bool,
}

impl LoggerBuilder {
    /// Create a new builder with no sinks and no steps
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            steps: Vec::new(),
            context: SinkContext::default(),
            default_sink: false,
        }
    }

    /// Start with the console sink `"default"` at INFO
    #[must_use = "builder methods return a new value"]
    pub fn default_sink(mut self) -> Self {
        self.default_sink = true;
        self
    }

    /// Add a sink
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Add a sink backed by `appender`
    #[must_use = "builder methods return a new value"]
    pub fn appender(
        self,
        name: impl Into<String>,
        threshold: impl Into<Threshold>,
        appender: Arc<dyn Appender>,
    ) -> Self {
        self.sink(Sink::new(name, threshold, appender))
    }

    /// Add a mutation step
    #[must_use = "builder methods return a new value"]
    pub fn step<S: MutationStep + 'static>(mut self, step: S) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    /// Add a synchronous mutation step
    #[must_use = "builder methods return a new value"]
    pub fn fn_step<F>(self, step: F) -> Self
    where
        F: Fn(&mut LogRecord) + Send + Sync + 'static,
    {
        self.step(SyncStep::new(step))
    }

    /// Set the handler for out-of-band notices
    ///
    /// Defaults to writing `[LOGGER ...]` lines to stderr.
    #[must_use = "builder methods return a new value"]
    pub fn on_notice(mut self, handler: NoticeHandler) -> Self {
        self.context.notices = handler;
        self
    }

    /// Set the clock used by sinks built from configuration
    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.context.clock = clock;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let mut sinks = Vec::with_capacity(self.sinks.len() + 1);
        if self.default_sink {
            let console = ConsoleAppender::new().with_clock(Arc::clone(&self.context.clock));
            sinks.push(Sink::new(DEFAULT_SINK_NAME, LogLevel::Info, Arc::new(console)));
        }
        sinks.extend(self.sinks);

        Logger::from_parts(sinks, self.steps, self.context)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::CallbackAppender;
    use parking_lot::Mutex;

    fn collector() -> (Arc<dyn Appender>, Arc<Mutex<Vec<Arc<LogRecord>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let appender = CallbackAppender::new(move |r| seen_clone.lock().push(r));
        (Arc::new(appender), seen)
    }

    #[test]
    fn test_new_has_default_console_sink() {
        let logger = Logger::new();
        assert_eq!(logger.sink_names(), vec![DEFAULT_SINK_NAME]);
        assert_eq!(logger.step_count(), 0);
    }

    #[test]
    fn test_builder_starts_empty() {
        let logger = Logger::builder().build();
        assert_eq!(logger.sink_count(), 0);
    }

    #[tokio::test]
    async fn test_matching_level_is_delivered() {
        let (appender, seen) = collector();
        let logger = Logger::builder().appender("fake", LogLevel::Info, appender).build();

        logger.log(LogLevel::Info, None, "TEST MESSAGE", None).await;

        assert_eq!(seen.lock()[0].message, "TEST MESSAGE");
    }

    #[tokio::test]
    async fn test_lower_level_is_filtered() {
        let (appender, seen) = collector();
        let logger = Logger::builder().appender("fake", LogLevel::Info, appender).build();

        logger.debug("TEST MESSAGE").await;

        assert!(seen.lock().is_empty());
        assert_eq!(logger.metrics().deliveries_filtered(), 1);
    }

    #[tokio::test]
    async fn test_panicking_sink_does_not_block_others() {
        let (appender, seen) = collector();
        let notices = Arc::new(Mutex::new(Vec::new()));
        let notices_clone = Arc::clone(&notices);

        let logger = Logger::builder()
            .appender(
                "broken",
                LogLevel::Debug,
                Arc::new(CallbackAppender::new(|_| panic!("sink exploded"))),
            )
            .appender("fake", LogLevel::Debug, appender)
            .on_notice(Arc::new(move |n: &Notice| notices_clone.lock().push(n.clone())))
            .build();

        logger.info("still delivered").await;

        assert_eq!(seen.lock().len(), 1);
        assert!(matches!(
            notices.lock().first(),
            Some(Notice::DeliveryFailed { sink, message }) if sink == "broken" && message.contains("sink exploded")
        ));
    }

    #[tokio::test]
    async fn test_flush_and_shutdown_without_network_sinks() {
        let (appender, _) = collector();
        let logger = Logger::builder().appender("fake", LogLevel::Info, appender).build();

        logger.flush().await.unwrap();
        logger.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_panicking_step_drops_only_its_record() {
        let (appender, seen) = collector();
        let notices = Arc::new(Mutex::new(Vec::new()));
        let notices_clone = Arc::clone(&notices);

        let logger = Logger::builder()
            .appender("fake", LogLevel::Debug, appender)
            .fn_step(|record: &mut LogRecord| {
                if record.message == "poison" {
                    panic!("step exploded");
                }
            })
            .on_notice(Arc::new(move |n: &Notice| notices_clone.lock().push(n.clone())))
            .build();

        logger.info("poison").await;
        logger.info("healthy").await;

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message, "healthy");
        assert_eq!(
            notices.lock().as_slice(),
            &[Notice::StepPanicked {
                step: 0,
                message: "step exploded".to_string(),
            }]
        );
        assert_eq!(logger.metrics().records_dispatched(), 1);
    }

    struct FailingAppender;

    #[async_trait::async_trait]
    impl Appender for FailingAppender {
        fn append(&self, _record: Arc<LogRecord>) {}

        async fn flush(&self) -> Result<()> {
            Err(LoggerError::other("disk full"))
        }

        async fn stop(&self) -> Result<()> {
            Err(LoggerError::other("already gone"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_flush_and_stop_failures_are_reported_as_notices() {
        let notices = Arc::new(Mutex::new(Vec::new()));
        let notices_clone = Arc::clone(&notices);
        let logger = Logger::builder()
            .appender("audit", LogLevel::Debug, Arc::new(FailingAppender))
            .on_notice(Arc::new(move |n: &Notice| notices_clone.lock().push(n.clone())))
            .build();

        assert!(logger.shutdown().await.is_err());

        assert_eq!(
            notices.lock().as_slice(),
            &[
                Notice::DeliveryFailed {
                    sink: "audit".to_string(),
                    message: "flush failed: disk full".to_string(),
                },
                Notice::DeliveryFailed {
                    sink: "audit".to_string(),
                    message: "failed to stop: already gone".to_string(),
                },
            ]
        );
    }
}
