//! The two [`JobScheduler`] strategies.
//!
//! [`TimerService`] drives jobs at a fixed cadence from tokio intervals;
//! [`LoopScheduler`] sleeps for the interval after each run, so its period
//! stretches with slow checks. Both contain tick failures: an `Err` from a
//! check is logged and the schedule keeps firing.

use dashmap::DashMap;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::port::{JobScheduler, JobSpec, TickFn};

/// Fixed-cadence scheduler. Jobs fire at `first_delay`, then every
/// `interval` regardless of how long each tick takes; ticks missed while
/// a slow check runs are skipped, not bunched.
#[derive(Default)]
pub struct TimerService {
    jobs: DashMap<String, oneshot::Sender<()>>,
}

impl TimerService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobScheduler for TimerService {
    fn schedule(&self, name: &str, spec: JobSpec, tick: TickFn) {
        // Re-arm semantics: an existing job with this name dies first.
        self.cancel(name);

        let (cancel_tx, mut cancel_rx) = oneshot::channel();
        self.jobs.insert(name.to_string(), cancel_tx);

        let job_name = name.to_string();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + spec.first_delay, spec.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = tick().await {
                            warn!(job = %job_name, error = %err, "Scheduled check failed");
                        }
                    }
                    _ = &mut cancel_rx => {
                        debug!(job = %job_name, "Job cancelled");
                        return;
                    }
                }
            }
        });

        info!(job = %name, "Scheduled periodic job");
    }

    fn cancel(&self, name: &str) -> bool {
        if let Some((_, cancel_tx)) = self.jobs.remove(name) {
            // The task may have died already; a failed send is fine.
            let _ = cancel_tx.send(());
            true
        } else {
            false
        }
    }

    fn cancel_all(&self) {
        let names: Vec<String> = self.jobs.iter().map(|e| e.key().clone()).collect();
        for name in &names {
            self.cancel(name);
        }
        if !names.is_empty() {
            info!(count = names.len(), "Cancelled all scheduled jobs");
        }
    }

    fn active_jobs(&self) -> usize {
        self.jobs.len()
    }
}

/// Cooperative-loop scheduler: sleep `first_delay`, then run-sleep-run
/// forever. Simpler than [`TimerService`] and immune to tick bunching,
/// at the cost of the period stretching by each check's duration.
#[derive(Default)]
pub struct LoopScheduler {
    jobs: DashMap<String, JoinHandle<()>>,
}

impl LoopScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobScheduler for LoopScheduler {
    fn schedule(&self, name: &str, spec: JobSpec, tick: TickFn) {
        self.cancel(name);

        let job_name = name.to_string();
        let handle = tokio::spawn(async move {
            sleep(spec.first_delay).await;
            loop {
                if let Err(err) = tick().await {
                    warn!(job = %job_name, error = %err, "Scheduled check failed");
                }
                sleep(spec.interval).await;
            }
        });

        self.jobs.insert(name.to_string(), handle);
        info!(job = %name, "Scheduled loop job");
    }

    fn cancel(&self, name: &str) -> bool {
        if let Some((_, handle)) = self.jobs.remove(name) {
            handle.abort();
            debug!(job = %name, "Job cancelled");
            true
        } else {
            false
        }
    }

    fn cancel_all(&self) {
        let names: Vec<String> = self.jobs.iter().map(|e| e.key().clone()).collect();
        for name in &names {
            self.cancel(name);
        }
        if !names.is_empty() {
            info!(count = names.len(), "Cancelled all scheduled jobs");
        }
    }

    fn active_jobs(&self) -> usize {
        self.jobs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::port::tick_fn;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn counting_tick(count: &Arc<AtomicU32>) -> TickFn {
        let count = Arc::clone(count);
        tick_fn(move || {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    fn failing_tick(count: &Arc<AtomicU32>) -> TickFn {
        let count = Arc::clone(count);
        tick_fn(move || {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Err(Error::Runtime("check blew up".into()))
            }
        })
    }

    fn spec(first_ms: u64, interval_ms: u64) -> JobSpec {
        JobSpec::new(
            Duration::from_millis(first_ms),
            Duration::from_millis(interval_ms),
        )
    }

    // -------------------------------------------------------------------------
    // TimerService
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn timer_fires_repeatedly() {
        let scheduler = TimerService::new();
        let count = Arc::new(AtomicU32::new(0));

        scheduler.schedule("job", spec(10, 25), counting_tick(&count));
        sleep(Duration::from_millis(120)).await;

        assert!(count.load(Ordering::SeqCst) >= 2);
        scheduler.cancel_all();
    }

    #[tokio::test]
    async fn rescheduling_replaces_the_old_job() {
        let scheduler = TimerService::new();
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));

        // The first registration would only fire far in the future; the
        // re-registration must supersede it, not run alongside.
        scheduler.schedule("job", spec(5_000, 5_000), counting_tick(&first));
        scheduler.schedule("job", spec(10, 20), counting_tick(&second));
        assert_eq!(scheduler.active_jobs(), 1);

        sleep(Duration::from_millis(80)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert!(second.load(Ordering::SeqCst) >= 1);
        scheduler.cancel_all();
    }

    #[tokio::test]
    async fn cancel_stops_future_ticks() {
        let scheduler = TimerService::new();
        let count = Arc::new(AtomicU32::new(0));

        scheduler.schedule("job", spec(10, 20), counting_tick(&count));
        sleep(Duration::from_millis(50)).await;

        assert!(scheduler.cancel("job"));
        assert!(!scheduler.cancel("job"));
        assert_eq!(scheduler.active_jobs(), 0);

        let after_cancel = count.load(Ordering::SeqCst);
        sleep(Duration::from_millis(80)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }

    #[tokio::test]
    async fn failing_ticks_do_not_stop_the_schedule() {
        let scheduler = TimerService::new();
        let count = Arc::new(AtomicU32::new(0));

        scheduler.schedule("job", spec(10, 20), failing_tick(&count));
        sleep(Duration::from_millis(100)).await;

        assert!(count.load(Ordering::SeqCst) >= 2);
        scheduler.cancel_all();
    }

    #[tokio::test]
    async fn cancel_all_empties_the_registry() {
        let scheduler = TimerService::new();
        let count = Arc::new(AtomicU32::new(0));

        scheduler.schedule("a", spec(1_000, 1_000), counting_tick(&count));
        scheduler.schedule("b", spec(1_000, 1_000), counting_tick(&count));
        assert_eq!(scheduler.active_jobs(), 2);

        scheduler.cancel_all();
        assert_eq!(scheduler.active_jobs(), 0);
    }

    // -------------------------------------------------------------------------
    // LoopScheduler
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn loop_scheduler_fires_repeatedly() {
        let scheduler = LoopScheduler::new();
        let count = Arc::new(AtomicU32::new(0));

        scheduler.schedule("job", spec(10, 25), counting_tick(&count));
        sleep(Duration::from_millis(120)).await;

        assert!(count.load(Ordering::SeqCst) >= 2);
        scheduler.cancel_all();
    }

    #[tokio::test]
    async fn loop_scheduler_rearms_instead_of_stacking() {
        let scheduler = LoopScheduler::new();
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));

        scheduler.schedule("job", spec(5_000, 5_000), counting_tick(&first));
        scheduler.schedule("job", spec(10, 20), counting_tick(&second));
        assert_eq!(scheduler.active_jobs(), 1);

        sleep(Duration::from_millis(80)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert!(second.load(Ordering::SeqCst) >= 1);
        scheduler.cancel_all();
    }

    #[tokio::test]
    async fn loop_scheduler_contains_failures() {
        let scheduler = LoopScheduler::new();
        let count = Arc::new(AtomicU32::new(0));

        scheduler.schedule("job", spec(10, 20), failing_tick(&count));
        sleep(Duration::from_millis(100)).await;

        assert!(count.load(Ordering::SeqCst) >= 2);
        scheduler.cancel_all();
    }

    #[tokio::test]
    async fn loop_scheduler_cancel_all() {
        let scheduler = LoopScheduler::new();
        let count = Arc::new(AtomicU32::new(0));

        scheduler.schedule("a", spec(1_000, 1_000), counting_tick(&count));
        scheduler.schedule("b", spec(1_000, 1_000), counting_tick(&count));
        assert_eq!(scheduler.active_jobs(), 2);

        scheduler.cancel_all();
        assert_eq!(scheduler.active_jobs(), 0);
    }
}
