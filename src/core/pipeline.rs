//! Mutation pipeline applied to every record before delivery
//!
//! Steps take the record by value and hand it back when done, so a step
//! cannot advance the pipeline twice. A step that never returns stalls
//! its own record (and that record's delivery) forever; there is no
//! timeout. Other records are unaffected because every dispatch runs its
//! own snapshot over its own record. A step that panics drops its record;
//! the panic is caught and reported instead of unwinding into `log()`.

use super::notice::{panic_message, Notice};
use super::record::LogRecord;
use async_trait::async_trait;
use futures_util::FutureExt;
use parking_lot::RwLock;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// One asynchronous transform applied to a record
///
/// Any `Fn(LogRecord) -> impl Future<Output = LogRecord>` closure is a step:
///
/// ```
/// use logall::core::{LogRecord, MutationPipeline};
///
/// let pipeline = MutationPipeline::new();
/// pipeline.register(|mut record: LogRecord| async move {
///     record.data_mut().insert("host", "web-1");
///     record
/// });
/// assert_eq!(pipeline.len(), 1);
/// ```
#[async_trait]
pub trait MutationStep: Send + Sync {
    async fn apply(&self, record: LogRecord) -> LogRecord;
}

#[async_trait]
impl<F, Fut> MutationStep for F
where
    F: Fn(LogRecord) -> Fut + Send + Sync,
    Fut: Future<Output = LogRecord> + Send + 'static,
{
    async fn apply(&self, record: LogRecord) -> LogRecord {
        (self)(record).await
    }
}

/// Adapter for synchronous mutators
pub struct SyncStep<F>(F);

impl<F> SyncStep<F>
where
    F: Fn(&mut LogRecord) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> MutationStep for SyncStep<F>
where
    F: Fn(&mut LogRecord) + Send + Sync,
{
    async fn apply(&self, mut record: LogRecord) -> LogRecord {
        (self.0)(&mut record);
        record
    }
}

/// Point-in-time copy of the registered steps
pub type StepSnapshot = Vec<Arc<dyn MutationStep>>;

/// Ordered list of registered steps
#[derive(Default)]
pub struct MutationPipeline {
    steps: RwLock<Vec<Arc<dyn MutationStep>>>,
}

impl MutationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step; it runs after every step registered before it
    pub fn register<S: MutationStep + 'static>(&self, step: S) {
        self.steps.write().push(Arc::new(step));
    }

    /// Append an already shared step
    pub fn register_shared(&self, step: Arc<dyn MutationStep>) {
        self.steps.write().push(step);
    }

    pub fn clear(&self) {
        self.steps.write().clear();
    }

    pub fn len(&self) -> usize {
        self.steps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.read().is_empty()
    }

    /// Copy of the current step list
    ///
    /// Steps registered or removed afterwards do not affect the copy.
    pub fn snapshot(&self) -> StepSnapshot {
        self.steps.read().clone()
    }
}

/// Run `record` through `steps`, one at a time, in order
///
/// Stops at the first step that panics and returns a
/// [`Notice::StepPanicked`] naming its position; the record is lost.
pub async fn run(steps: StepSnapshot, mut record: LogRecord) -> Result<LogRecord, Notice> {
    for (index, step) in steps.into_iter().enumerate() {
        record = AssertUnwindSafe(step.apply(record))
            .catch_unwind()
            .await
            .map_err(|payload| Notice::StepPanicked {
                step: index,
                message: panic_message(payload.as_ref()),
            })?;
    }
    Ok(record)
}
