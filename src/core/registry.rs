//! Sink registry
//!
//! The registry is an explicit instance shared by `Arc`, not a global.
//! Dispatches read it through [`SinkRegistry::snapshot`], so registrations,
//! removals and threshold changes made while a record is in flight only
//! affect later records.

use super::{appender::Appender, log_level::LogLevel, record::LogRecord};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Record-dependent threshold function
pub type ThresholdFn = Arc<dyn Fn(&LogRecord) -> LogLevel + Send + Sync>;

/// Minimum level a record needs to reach a sink
#[derive(Clone)]
pub enum Threshold {
    Static(LogLevel),
    /// Re-evaluated against every finished record
    Dynamic(ThresholdFn),
}

impl Threshold {
    /// Build a dynamic threshold from a closure
    ///
    /// ```
    /// use logall::core::{LogLevel, Threshold};
    ///
    /// // Everything from the "billing" module, INFO and up elsewhere
    /// let threshold = Threshold::dynamic(|record| {
    ///     if record.module.as_deref() == Some("billing") {
    ///         LogLevel::Debug
    ///     } else {
    ///         LogLevel::Info
    ///     }
    /// });
    /// ```
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&LogRecord) -> LogLevel + Send + Sync + 'static,
    {
        Threshold::Dynamic(Arc::new(f))
    }

    /// Threshold that applies to `record`
    pub fn resolve(&self, record: &LogRecord) -> LogLevel {
        match self {
            Threshold::Static(level) => *level,
            Threshold::Dynamic(f) => f(record),
        }
    }

    /// Whether `record` should be delivered under this threshold
    pub fn admits(&self, record: &LogRecord) -> bool {
        record.level.passes(self.resolve(record))
    }
}

impl From<LogLevel> for Threshold {
    fn from(level: LogLevel) -> Self {
        Threshold::Static(level)
    }
}

impl fmt::Debug for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Static(level) => write!(f, "Static({})", level),
            Threshold::Dynamic(_) => write!(f, "Dynamic(<fn>)"),
        }
    }
}

/// A registered delivery target
#[derive(Clone)]
pub struct Sink {
    name: String,
    threshold: Threshold,
    appender: Arc<dyn Appender>,
}

impl Sink {
    pub fn new(
        name: impl Into<String>,
        threshold: impl Into<Threshold>,
        appender: Arc<dyn Appender>,
    ) -> Self {
        Self {
            name: name.into(),
            threshold: threshold.into(),
            appender,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    pub fn appender(&self) -> &Arc<dyn Appender> {
        &self.appender
    }

    /// Copy of this sink with a different threshold
    #[must_use]
    pub fn with_threshold(&self, threshold: Threshold) -> Self {
        Self {
            name: self.name.clone(),
            threshold,
            appender: Arc::clone(&self.appender),
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("appender", &self.appender.name())
            .finish()
    }
}

/// Ordered list of registered sinks
#[derive(Default)]
pub struct SinkRegistry {
    sinks: RwLock<Vec<Arc<Sink>>>,
}

impl SinkRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sink; names are not required to be unique
    pub fn register(&self, sink: Sink) {
        self.sinks.write().push(Arc::new(sink));
    }

    /// Replace the threshold of the first sink named `name`
    ///
    /// Returns `false` and changes nothing when no sink has that name.
    pub fn set_threshold(&self, name: &str, threshold: impl Into<Threshold>) -> bool {
        let mut sinks = self.sinks.write();
        match sinks.iter_mut().find(|s| s.name == name) {
            Some(slot) => {
                *slot = Arc::new(slot.with_threshold(threshold.into()));
                true
            }
            None => false,
        }
    }

    /// Remove every sink
    ///
    /// Snapshots taken earlier keep their sinks usable; a sink is released
    /// once the last snapshot holding it is dropped.
    pub fn clear(&self) {
        self.sinks.write().clear();
    }

    /// Point-in-time copy of the sinks in registration order
    pub fn snapshot(&self) -> Vec<Arc<Sink>> {
        self.sinks.read().clone()
    }

    pub fn len(&self) -> usize {
        self.sinks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.read().is_empty()
    }

    /// Sink names in registration order
    pub fn names(&self) -> Vec<String> {
        self.sinks.read().iter().map(|s| s.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::CallbackAppender;

    fn noop() -> Arc<dyn Appender> {
        Arc::new(CallbackAppender::new(|_| {}))
    }

    #[test]
    fn test_register_appends_in_order() {
        let registry = SinkRegistry::new();
        registry.register(Sink::new("a", LogLevel::Info, noop()));
        registry.register(Sink::new("b", LogLevel::Debug, noop()));
        registry.register(Sink::new("a", LogLevel::Error, noop()));

        assert_eq!(registry.names(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_set_threshold_changes_first_match_only() {
        let registry = SinkRegistry::new();
        registry.register(Sink::new("dup", LogLevel::Info, noop()));
        registry.register(Sink::new("dup", LogLevel::Info, noop()));

        assert!(registry.set_threshold("dup", LogLevel::Debug));

        let record = LogRecord::new(LogLevel::Debug, "m");
        let sinks = registry.snapshot();
        assert!(sinks[0].threshold().admits(&record));
        assert!(!sinks[1].threshold().admits(&record));
    }

    #[test]
    fn test_set_threshold_unknown_name_is_noop() {
        let registry = SinkRegistry::new();
        registry.register(Sink::new("console", LogLevel::Info, noop()));

        assert!(!registry.set_threshold("missing", LogLevel::Debug));
        let record = LogRecord::new(LogLevel::Debug, "m");
        assert!(!registry.snapshot()[0].threshold().admits(&record));
    }

    #[test]
    fn test_snapshot_unaffected_by_later_threshold_change() {
        let registry = SinkRegistry::new();
        registry.register(Sink::new("console", LogLevel::Error, noop()));

        let before = registry.snapshot();
        registry.set_threshold("console", LogLevel::Debug);

        let record = LogRecord::new(LogLevel::Info, "m");
        assert!(!before[0].threshold().admits(&record));
        assert!(registry.snapshot()[0].threshold().admits(&record));
    }

    #[test]
    fn test_dynamic_threshold_sees_record() {
        let threshold = Threshold::dynamic(|r: &LogRecord| {
            if r.module.as_deref() == Some("noisy") {
                LogLevel::Error
            } else {
                LogLevel::Debug
            }
        });

        let quiet = LogRecord::new(LogLevel::Info, "m").with_module("web");
        let noisy = LogRecord::new(LogLevel::Info, "m").with_module("noisy");
        assert!(threshold.admits(&quiet));
        assert!(!threshold.admits(&noisy));
    }

    #[test]
    fn test_clear_keeps_earlier_snapshots() {
        let registry = SinkRegistry::new();
        registry.register(Sink::new("a", LogLevel::Info, noop()));

        let in_flight = registry.snapshot();
        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(in_flight.len(), 1);
        assert_eq!(in_flight[0].name(), "a");
    }
}
