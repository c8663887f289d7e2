//! Outbound Telegram delivery.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::port::AlertSink;

/// One formatted alert bound for one chat.
#[derive(Debug)]
struct OutboundAlert {
    chat_id: i64,
    text: String,
}

/// Alert sink backed by an unbounded channel and a spawned send worker.
///
/// `deliver` never blocks and never fails; a dead worker only produces a
/// warning, so a broken Telegram connection cannot stall a poll loop.
pub struct TelegramSink {
    sender: mpsc::UnboundedSender<OutboundAlert>,
}

impl TelegramSink {
    /// Create the sink and spawn its background send worker.
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(telegram_worker(bot, receiver));
        Self { sender }
    }
}

impl AlertSink for TelegramSink {
    fn deliver(&self, chat_id: i64, text: String) {
        if self.sender.send(OutboundAlert { chat_id, text }).is_err() {
            warn!("Telegram alert channel closed");
        }
    }
}

/// Background worker that sends queued alerts as HTML messages.
async fn telegram_worker(bot: Bot, mut receiver: mpsc::UnboundedReceiver<OutboundAlert>) {
    info!("Telegram alert worker started");

    while let Some(alert) = receiver.recv().await {
        if let Err(e) = bot
            .send_message(ChatId(alert.chat_id), &alert.text)
            .parse_mode(ParseMode::Html)
            .await
        {
            error!(error = %e, chat_id = alert.chat_id, "Failed to send Telegram alert");
        }
    }

    warn!("Telegram alert worker shutting down");
}
