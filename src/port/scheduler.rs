//! Scheduling port: named periodic jobs behind one interface.
//!
//! Two implementations exist (shared timer service, cooperative loops);
//! check logic is written against this trait and cannot tell which one is
//! driving it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

/// Boxed async check invoked on every tick.
///
/// Ticks return `Result` so schedulers can log failures; a failing tick
/// never stops the schedule.
pub type TickFn = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

/// Wrap an async closure into a [`TickFn`].
pub fn tick_fn<F, Fut>(f: F) -> TickFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

/// Cadence for one named job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSpec {
    /// Delay before the first tick.
    pub first_delay: Duration,
    /// Delay between subsequent ticks.
    pub interval: Duration,
}

impl JobSpec {
    #[must_use]
    pub const fn new(first_delay: Duration, interval: Duration) -> Self {
        Self {
            first_delay,
            interval,
        }
    }
}

/// Named periodic jobs.
///
/// Scheduling a name that is already registered cancels the old job first,
/// which is what makes session (re)starts idempotent rather than additive.
pub trait JobScheduler: Send + Sync {
    fn schedule(&self, name: &str, spec: JobSpec, tick: TickFn);

    /// Cancel one job. Returns `true` when a job with that name existed.
    fn cancel(&self, name: &str) -> bool;

    fn cancel_all(&self);

    /// Number of currently registered jobs.
    fn active_jobs(&self) -> usize;
}
