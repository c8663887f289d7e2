//! Inbound control port: what the command layer may ask of the app.

use async_trait::async_trait;

use super::marketplace::ApiProbe;
use crate::error::Result;

/// Session and on-demand check operations exposed to command handlers.
#[async_trait]
pub trait WatchControl: Send + Sync {
    /// Create or re-arm the periodic checks for a chat. Idempotent: calling
    /// it again replaces the chat's timers instead of stacking new ones.
    async fn start_session(&self, chat_id: i64);

    /// On-demand message check. Returns the alert texts for every currently
    /// unread conversation; deliberately does not touch the dedup state, so
    /// it reports a snapshot rather than a diff.
    async fn check_messages_now(&self, chat_id: i64) -> Result<Vec<String>>;

    /// On-demand order check. Shares the scheduled path's dedup state: an
    /// order reported here will not be re-announced by the background check.
    async fn check_orders_now(&self, chat_id: i64) -> Result<Vec<String>>;

    /// Probe upstream endpoints for the diagnostics command.
    async fn probe_api(&self) -> ApiProbe;
}
