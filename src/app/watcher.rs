//! The watcher: sessions, periodic sweeps, and on-demand checks.
//!
//! [`Watcher`] is the application core behind the [`WatchControl`] port.
//! Starting a session arms two named jobs per chat (messages, orders) on
//! the configured scheduler; each tick scans through [`ChangeDetector`] and
//! pushes fresh alerts into the [`AlertSink`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::app::detector::{ChangeDetector, DetectorLimits};
use crate::app::session::{ChatSession, SessionRegistry};
use crate::config::ChecksConfig;
use crate::error::Result;
use crate::port::{
    tick_fn, AlertSink, ApiProbe, JobScheduler, JobSpec, Marketplace, WatchControl,
};

/// Cadence for the two per-chat jobs, lifted from config once at startup.
#[derive(Debug, Clone, Copy)]
pub struct CheckCadence {
    pub messages: JobSpec,
    pub orders: JobSpec,
}

impl CheckCadence {
    #[must_use]
    pub fn from_config(checks: &ChecksConfig) -> Self {
        Self {
            messages: JobSpec::new(
                Duration::from_secs(checks.message_first_delay_secs),
                Duration::from_secs(checks.message_interval_secs),
            ),
            orders: JobSpec::new(
                Duration::from_secs(checks.order_first_delay_secs),
                Duration::from_secs(checks.order_interval_secs),
            ),
        }
    }
}

/// Application core driving sessions and checks.
pub struct Watcher {
    marketplace: Arc<dyn Marketplace>,
    detector: Arc<ChangeDetector>,
    registry: SessionRegistry,
    scheduler: Arc<dyn JobScheduler>,
    sink: Arc<dyn AlertSink>,
    cadence: CheckCadence,
}

impl Watcher {
    pub fn new(
        marketplace: Arc<dyn Marketplace>,
        scheduler: Arc<dyn JobScheduler>,
        sink: Arc<dyn AlertSink>,
        limits: DetectorLimits,
        cadence: CheckCadence,
    ) -> Self {
        let detector = Arc::new(ChangeDetector::new(Arc::clone(&marketplace), limits));
        Self {
            marketplace,
            detector,
            registry: SessionRegistry::new(),
            scheduler,
            sink,
            cadence,
        }
    }

    fn arm_message_job(&self, chat_id: i64, session: &Arc<ChatSession>) {
        let detector = Arc::clone(&self.detector);
        let sink = Arc::clone(&self.sink);
        let session = Arc::clone(session);
        let tick = tick_fn(move || {
            let detector = Arc::clone(&detector);
            let sink = Arc::clone(&sink);
            let session = Arc::clone(&session);
            async move {
                let alerts = detector.scan_messages(&session).await?;
                deliver_batch(sink.as_ref(), chat_id, &alerts);
                Ok(())
            }
        });
        self.scheduler
            .schedule(&message_job(chat_id), self.cadence.messages, tick);
    }

    fn arm_order_job(&self, chat_id: i64, session: &Arc<ChatSession>) {
        let detector = Arc::clone(&self.detector);
        let sink = Arc::clone(&self.sink);
        let session = Arc::clone(session);
        let tick = tick_fn(move || {
            let detector = Arc::clone(&detector);
            let sink = Arc::clone(&sink);
            let session = Arc::clone(&session);
            async move {
                let alerts = detector.scan_orders(&session).await?;
                deliver_batch(sink.as_ref(), chat_id, &alerts);
                Ok(())
            }
        });
        self.scheduler
            .schedule(&order_job(chat_id), self.cadence.orders, tick);
    }
}

#[async_trait]
impl WatchControl for Watcher {
    /// Start (or re-arm) the watch for a chat.
    ///
    /// Runs one message sweep inline so the chat hears about the current
    /// backlog right away; a failure there is logged and swallowed because
    /// the jobs it arms next will retry anyway.
    async fn start_session(&self, chat_id: i64) {
        let session = self.registry.session(chat_id);

        match self.detector.scan_messages(&session).await {
            Ok(alerts) => deliver_batch(self.sink.as_ref(), chat_id, &alerts),
            Err(error) => warn!(chat_id, %error, "Start-up message sweep failed"),
        }

        self.arm_message_job(chat_id, &session);
        self.arm_order_job(chat_id, &session);
        info!(
            chat_id,
            active_jobs = self.scheduler.active_jobs(),
            "Watch session started"
        );
    }

    async fn check_messages_now(&self, _chat_id: i64) -> Result<Vec<String>> {
        self.detector.snapshot_messages().await
    }

    async fn check_orders_now(&self, chat_id: i64) -> Result<Vec<String>> {
        let session = self.registry.session(chat_id);
        self.detector.scan_orders(&session).await
    }

    async fn probe_api(&self) -> ApiProbe {
        self.marketplace.probe().await
    }
}

fn message_job(chat_id: i64) -> String {
    format!("messages:{chat_id}")
}

fn order_job(chat_id: i64) -> String {
    format!("orders:{chat_id}")
}

/// Push one tick's alerts as a single message, blank-line separated.
fn deliver_batch(sink: &dyn AlertSink, chat_id: i64, alerts: &[String]) {
    if alerts.is_empty() {
        return;
    }
    sink.deliver(chat_id, alerts.join("\n\n"));
}
