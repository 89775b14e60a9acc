//! Dispatch metrics for observability
//!
//! Counters for how many records went through the dispatcher, how many
//! sink deliveries were started or filtered out, and how the network
//! sinks fared.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by a logger and its network sinks
///
/// # Example
///
/// ```
/// use logall::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_delivery_started();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.records_dispatched(), 1);
/// assert_eq!(metrics.deliveries_started(), 1);
/// assert_eq!(metrics.deliveries_filtered(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records whose pipeline completed and whose fan-out began
    records_dispatched: AtomicU64,

    /// Sink deliveries started (one record may start several)
    deliveries_started: AtomicU64,

    /// Sink evaluations where the record was below the threshold
    deliveries_filtered: AtomicU64,

    /// Structured events written to a transport
    events_sent: AtomicU64,

    /// Transport or encoding failures reported as notices
    transport_faults: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_dispatched: AtomicU64::new(0),
            deliveries_started: AtomicU64::new(0),
            deliveries_filtered: AtomicU64::new(0),
            events_sent: AtomicU64::new(0),
            transport_faults: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_dispatched(&self) -> u64 {
        self.records_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries_started(&self) -> u64 {
        self.deliveries_started.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries_filtered(&self) -> u64 {
        self.deliveries_filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn events_sent(&self) -> u64 {
        self.events_sent.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn transport_faults(&self) -> u64 {
        self.transport_faults.load(Ordering::Relaxed)
    }

    /// Record a dispatched record, returning the previous count
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.records_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivery_started(&self) -> u64 {
        self.deliveries_started.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.deliveries_filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sent(&self) -> u64 {
        self.events_sent.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_transport_fault(&self) -> u64 {
        self.transport_faults.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of sink evaluations that were filtered out (0.0 - 100.0)
    ///
    /// Returns 0.0 if no sink has been evaluated yet.
    pub fn filter_rate(&self) -> f64 {
        let filtered = self.deliveries_filtered() as f64;
        let total = self.deliveries_started() as f64 + filtered;
        if total == 0.0 {
            0.0
        } else {
            (filtered / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.records_dispatched.store(0, Ordering::Relaxed);
        self.deliveries_started.store(0, Ordering::Relaxed);
        self.deliveries_filtered.store(0, Ordering::Relaxed);
        self.events_sent.store(0, Ordering::Relaxed);
        self.transport_faults.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_dispatched: AtomicU64::new(self.records_dispatched()),
            deliveries_started: AtomicU64::new(self.deliveries_started()),
            deliveries_filtered: AtomicU64::new(self.deliveries_filtered()),
            events_sent: AtomicU64::new(self.events_sent()),
            transport_faults: AtomicU64::new(self.transport_faults()),
        }
    }
}
