//! Change detection over the marketplace surface.
//!
//! [`ChangeDetector`] turns raw listings into alert texts. It owns the
//! probe-then-refetch message strategy and the paid-order filter, while
//! dedup state lives in the caller's [`ChatSession`].

use std::sync::Arc;

use tracing::debug;

use crate::app::session::ChatSession;
use crate::config::GgselConfig;
use crate::domain::{
    latest_buyer_message, message_alert, message_key, order_alert, order_key, ChatMessage,
    ChatSummary, OrderSummary,
};
use crate::error::Result;
use crate::port::Marketplace;

/// Fetch-size knobs, lifted from config once at startup.
#[derive(Debug, Clone, Copy)]
pub struct DetectorLimits {
    /// Page size for the unread-conversation listing.
    pub chats_pagesize: u32,
    /// Cheap first fetch per conversation; usually 1.
    pub probe_count: u32,
    /// Deep fetch when the probe window holds no buyer message.
    pub refetch_count: u32,
    /// How many recent sales to examine per order sweep.
    pub sales_top: u32,
}

impl DetectorLimits {
    #[must_use]
    pub fn from_config(config: &GgselConfig) -> Self {
        Self {
            chats_pagesize: config.chats_pagesize,
            probe_count: config.probe_count,
            refetch_count: config.refetch_count,
            sales_top: config.sales_top,
        }
    }
}

/// Stateless scanner over a [`Marketplace`].
///
/// Each scan method reads the current upstream state and reports what is
/// new relative to the [`ChatSession`] it is given. The snapshot variant
/// reports without consulting or updating any session.
pub struct ChangeDetector {
    marketplace: Arc<dyn Marketplace>,
    limits: DetectorLimits,
}

impl ChangeDetector {
    pub fn new(marketplace: Arc<dyn Marketplace>, limits: DetectorLimits) -> Self {
        Self {
            marketplace,
            limits,
        }
    }

    /// Unread conversations paired with their selected buyer message.
    ///
    /// A conversation whose thread cannot be read (or holds no buyer
    /// message) still appears, with `None`; the unread flag alone is worth
    /// reporting.
    async fn unread_conversations(&self) -> Result<Vec<(ChatSummary, Option<ChatMessage>)>> {
        let chats = self
            .marketplace
            .list_chats(true, 1, self.limits.chats_pagesize)
            .await?;

        let mut out = Vec::with_capacity(chats.len());
        for chat in chats {
            let message = self.select_buyer_message(chat.id).await;
            out.push((chat, message));
        }
        Ok(out)
    }

    /// Latest buyer message in a conversation, probe-first.
    ///
    /// Fetches a tiny window first; only when that window has no usable
    /// buyer message does it pay for the deep fetch. Fetch errors degrade
    /// to "no message" so one unreadable thread cannot abort a whole sweep.
    async fn select_buyer_message(&self, conversation_id: i64) -> Option<ChatMessage> {
        let probe = self
            .fetch_messages(conversation_id, self.limits.probe_count)
            .await;
        if let Some(message) = latest_buyer_message(&probe) {
            return Some(message.clone());
        }

        let full = self
            .fetch_messages(conversation_id, self.limits.refetch_count)
            .await;
        latest_buyer_message(&full).cloned()
    }

    async fn fetch_messages(&self, conversation_id: i64, count: u32) -> Vec<ChatMessage> {
        match self.marketplace.list_messages(conversation_id, count, None).await {
            Ok(messages) => messages,
            Err(error) => {
                debug!(conversation_id, %error, "Message fetch failed, treating thread as empty");
                Vec::new()
            }
        }
    }

    /// All currently-unread conversations as alert texts, ignoring dedup.
    ///
    /// Backs the manual check command: the user asked "what is unread right
    /// now", so nothing is marked seen and repeat invocations repeat the
    /// answer.
    pub async fn snapshot_messages(&self) -> Result<Vec<String>> {
        let conversations = self.unread_conversations().await?;
        Ok(conversations
            .iter()
            .map(|(chat, message)| message_alert(chat, message.as_ref()))
            .collect())
    }

    /// Unread conversations not yet reported to this session.
    ///
    /// Marks every returned conversation seen under its message key, so the
    /// periodic sweep alerts once per new message event.
    pub async fn scan_messages(&self, session: &ChatSession) -> Result<Vec<String>> {
        let conversations = self.unread_conversations().await?;

        let mut alerts = Vec::new();
        for (chat, message) in &conversations {
            let key = message_key(chat, message.as_ref());
            if !session.seen_messages.insert(key) {
                continue;
            }
            alerts.push(message_alert(chat, message.as_ref()));
        }
        debug!(
            unread = conversations.len(),
            new = alerts.len(),
            "Message sweep finished"
        );
        Ok(alerts)
    }

    /// Recent sales that became paid and were not yet reported.
    ///
    /// Seen invoices are skipped before the per-invoice detail fetch, so a
    /// stable recent-sales window costs one listing call per sweep. Unpaid
    /// sales are left unmarked and re-checked next sweep.
    pub async fn scan_orders(&self, session: &ChatSession) -> Result<Vec<String>> {
        let sales = self.marketplace.last_sales(self.limits.sales_top).await?;

        let mut alerts = Vec::new();
        for sale in &sales {
            let Some(invoice_id) = sale.invoice_id else {
                continue;
            };
            let key = order_key(invoice_id);
            if session.seen_orders.contains(&key) {
                continue;
            }

            let detail = self.marketplace.purchase_detail(invoice_id).await?;
            if !detail.is_paid() {
                continue;
            }
            let Some(order) = OrderSummary::from_sale(sale, &detail) else {
                continue;
            };

            session.seen_orders.insert(key);
            alerts.push(order_alert(&order));
        }
        debug!(
            window = sales.len(),
            new = alerts.len(),
            "Order sweep finished"
        );
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{
        buyer_message, chat, deleted_buyer_message, invoiceless_sale, paid_detail, sale,
        seller_message, unpaid_detail,
    };
    use crate::testkit::marketplace::ScriptedMarketplace;

    fn limits() -> DetectorLimits {
        DetectorLimits {
            chats_pagesize: 50,
            probe_count: 1,
            refetch_count: 100,
            sales_top: 4,
        }
    }

    fn detector(marketplace: Arc<ScriptedMarketplace>) -> ChangeDetector {
        ChangeDetector::new(marketplace, limits())
    }

    // ------------------------------------------------------------------
    // Message sweeps
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn message_sweep_alerts_once_per_event() {
        let marketplace = Arc::new(
            ScriptedMarketplace::new()
                .with_chats(vec![chat(1)])
                .with_messages(1, vec![buyer_message(10, "hello", "2024-05-01T10:00:00Z")]),
        );
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        let first = detector.scan_messages(&session).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(first[0].contains("hello"));
        assert!(first[0].contains("buyer1@example.com"));

        let second = detector.scan_messages(&session).await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn new_message_in_known_conversation_alerts_again() {
        let marketplace = Arc::new(
            ScriptedMarketplace::new()
                .with_chats(vec![chat(1)])
                .with_messages(1, vec![buyer_message(10, "first", "2024-05-01T10:00:00Z")]),
        );
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        assert_eq!(detector.scan_messages(&session).await.unwrap().len(), 1);

        marketplace.set_messages(1, vec![buyer_message(11, "second", "2024-05-01T11:00:00Z")]);
        let alerts = detector.scan_messages(&session).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("second"));
    }

    #[tokio::test]
    async fn snapshot_repeats_and_marks_nothing() {
        let marketplace = Arc::new(
            ScriptedMarketplace::new()
                .with_chats(vec![chat(1)])
                .with_messages(1, vec![buyer_message(10, "hello", "2024-05-01T10:00:00Z")]),
        );
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        assert_eq!(detector.snapshot_messages().await.unwrap().len(), 1);
        assert_eq!(detector.snapshot_messages().await.unwrap().len(), 1);

        // The snapshot left no trace: the periodic sweep still alerts.
        assert_eq!(detector.scan_messages(&session).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn probe_hit_skips_the_deep_fetch() {
        let marketplace = Arc::new(
            ScriptedMarketplace::new()
                .with_chats(vec![chat(1)])
                .with_messages(1, vec![buyer_message(10, "hi", "2024-05-01T10:00:00Z")]),
        );
        let detector = detector(Arc::clone(&marketplace));

        detector.snapshot_messages().await.unwrap();
        assert_eq!(marketplace.message_requests(), vec![(1, 1)]);
    }

    #[tokio::test]
    async fn probe_miss_refetches_and_selects_by_timestamp() {
        // The probe window holds only the seller's reply; the deep fetch
        // reveals two buyer messages in upstream (shuffled) order.
        let marketplace = Arc::new(
            ScriptedMarketplace::new()
                .with_chats(vec![chat(1)])
                .with_messages(
                    1,
                    vec![
                        seller_message(12, "thanks!", "2024-05-01T12:00:00Z"),
                        buyer_message(10, "older question", "2024-05-01T10:00:00Z"),
                        buyer_message(11, "newer question", "2024-05-01T11:00:00Z"),
                    ],
                ),
        );
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        let alerts = detector.scan_messages(&session).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("newer question"));
        assert_eq!(marketplace.message_requests(), vec![(1, 1), (1, 100)]);
    }

    #[tokio::test]
    async fn conversation_without_buyer_messages_gets_synthetic_alert() {
        let marketplace = Arc::new(
            ScriptedMarketplace::new()
                .with_chats(vec![chat(1)])
                .with_messages(
                    1,
                    vec![
                        seller_message(12, "any luck?", "2024-05-01T12:00:00Z"),
                        deleted_buyer_message(13, "nevermind", "2024-05-01T13:00:00Z"),
                    ],
                ),
        );
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        let alerts = detector.scan_messages(&session).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("New messages: 1"));

        // The synthetic alert dedups on the thread snapshot.
        assert!(detector.scan_messages(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_unreadable_thread_does_not_hide_the_others() {
        let marketplace = Arc::new(
            ScriptedMarketplace::new()
                .with_chats(vec![chat(1), chat(2)])
                .with_messages(2, vec![buyer_message(20, "still here", "2024-05-01T10:00:00Z")]),
        );
        marketplace.fail_conversation(1);
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        let alerts = detector.scan_messages(&session).await.unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().any(|a| a.contains("New messages: 1")));
        assert!(alerts.iter().any(|a| a.contains("still here")));
    }

    #[tokio::test]
    async fn listing_failure_propagates() {
        let marketplace = Arc::new(ScriptedMarketplace::new());
        marketplace.fail_chats(true);
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        assert!(detector.scan_messages(&session).await.is_err());
        assert!(detector.snapshot_messages().await.is_err());
    }

    // ------------------------------------------------------------------
    // Order sweeps
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn order_sweep_reports_paid_invoices_once() {
        let marketplace = Arc::new(
            ScriptedMarketplace::new()
                .with_sales(vec![sale(11, "Steam key"), invoiceless_sale("Gift card")])
                .with_detail(11, paid_detail("Steam key (RU)")),
        );
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        let first = detector.scan_orders(&session).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(first[0].contains("11"));
        assert!(first[0].contains("Steam key (RU)"));

        assert!(detector.scan_orders(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unpaid_sale_is_rechecked_until_it_pays() {
        let marketplace = Arc::new(
            ScriptedMarketplace::new()
                .with_sales(vec![sale(11, "Steam key")])
                .with_detail(11, unpaid_detail()),
        );
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        assert!(detector.scan_orders(&session).await.unwrap().is_empty());
        assert!(detector.scan_orders(&session).await.unwrap().is_empty());

        marketplace.set_detail(11, paid_detail("Steam key"));
        let alerts = detector.scan_orders(&session).await.unwrap();
        assert_eq!(alerts.len(), 1);

        // Unpaid sweeps kept refetching; the paid invoice stops costing.
        assert_eq!(marketplace.detail_requests(), vec![11, 11, 11]);
        assert!(detector.scan_orders(&session).await.unwrap().is_empty());
        assert_eq!(marketplace.detail_requests(), vec![11, 11, 11]);
    }

    #[tokio::test]
    async fn detail_failure_propagates() {
        let marketplace = Arc::new(
            ScriptedMarketplace::new().with_sales(vec![sale(11, "Steam key")]),
        );
        marketplace.fail_detail(11);
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        assert!(detector.scan_orders(&session).await.is_err());
    }

    #[tokio::test]
    async fn sales_listing_failure_propagates() {
        let marketplace = Arc::new(ScriptedMarketplace::new());
        marketplace.fail_sales(true);
        let detector = detector(Arc::clone(&marketplace));
        let session = ChatSession::new(42);

        assert!(detector.scan_orders(&session).await.is_err());
    }

    #[tokio::test]
    async fn sessions_do_not_share_order_dedup() {
        let marketplace = Arc::new(
            ScriptedMarketplace::new()
                .with_sales(vec![sale(11, "Steam key")])
                .with_detail(11, paid_detail("Steam key")),
        );
        let detector = detector(Arc::clone(&marketplace));
        let one = ChatSession::new(1);
        let two = ChatSession::new(2);

        assert_eq!(detector.scan_orders(&one).await.unwrap().len(), 1);
        assert_eq!(detector.scan_orders(&two).await.unwrap().len(), 1);
        assert!(detector.scan_orders(&one).await.unwrap().is_empty());
    }
}
