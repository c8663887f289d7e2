//! Composition root: wire configuration into a running watcher.

use std::sync::Arc;

#[cfg(feature = "telegram")]
use tracing::info;

use crate::adapter::ggsel::GgselClient;
use crate::app::detector::DetectorLimits;
use crate::app::scheduler::{LoopScheduler, TimerService};
use crate::app::watcher::{CheckCadence, Watcher};
use crate::config::{Config, SchedulerKind};
use crate::error::Result;
use crate::port::{AlertSink, JobScheduler, Marketplace};

#[cfg(feature = "telegram")]
use crate::adapter::telegram::{command_worker, TelegramSink};
#[cfg(feature = "telegram")]
use teloxide::Bot;

/// Main application struct.
pub struct App;

impl App {
    /// Run the bot until the Telegram command worker stops.
    ///
    /// The worker owns the process lifetime; `main` races this future
    /// against ctrl-c and the scheduler is drained on either exit.
    #[cfg(feature = "telegram")]
    pub async fn run(config: Config) -> Result<()> {
        let bot = Bot::new(&config.telegram.bot_token);
        let sink: Arc<dyn AlertSink> = Arc::new(TelegramSink::new(bot.clone()));
        let scheduler = build_scheduler(config.checks.scheduler);
        let watcher = build_watcher(&config, Arc::clone(&scheduler), sink)?;

        info!(
            seller_id = config.ggsel.seller_id,
            scheduler = ?config.checks.scheduler,
            "Watcher starting"
        );

        command_worker(
            bot,
            watcher,
            config.telegram.allowed_chats.clone(),
            config.ggsel.seller_id,
        )
        .await;

        scheduler.cancel_all();
        info!("Watcher stopped");
        Ok(())
    }
}

/// Build the full marketplace-to-watcher stack for one configuration.
///
/// Shared by the bot and the one-shot CLI commands; only the sink differs.
pub fn build_watcher(
    config: &Config,
    scheduler: Arc<dyn JobScheduler>,
    sink: Arc<dyn AlertSink>,
) -> Result<Arc<Watcher>> {
    let client = GgselClient::from_config(&config.ggsel)?;
    let marketplace: Arc<dyn Marketplace> = Arc::new(client);
    Ok(Arc::new(Watcher::new(
        marketplace,
        scheduler,
        sink,
        DetectorLimits::from_config(&config.ggsel),
        CheckCadence::from_config(&config.checks),
    )))
}

/// Scheduler implementation selected by config.
pub fn build_scheduler(kind: SchedulerKind) -> Arc<dyn JobScheduler> {
    match kind {
        SchedulerKind::Timer => Arc::new(TimerService::new()),
        SchedulerKind::Loop => Arc::new(LoopScheduler::new()),
    }
}
