//! Per-session dedup memory.

use std::collections::HashSet;

use parking_lot::Mutex;

use super::conversation::{ChatMessage, ChatSummary};

/// Growing set of already-reported composite keys.
///
/// Insert-only for the process lifetime; the guard makes back-to-back ticks
/// for the same category race-safe. No key ever leaves the set, so "already
/// seen" can only mean "reported earlier in this run".
#[derive(Debug, Default)]
pub struct SeenSet {
    keys: Mutex<HashSet<String>>,
}

impl SeenSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, returning `true` when it was not seen before.
    pub fn insert(&self, key: impl Into<String>) -> bool {
        self.keys.lock().insert(key.into())
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.lock().contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.lock().is_empty()
    }
}

/// Dedup key for a message event: `{conversation}:{identity token}`.
///
/// The identity token prefers the message id, then the message timestamp,
/// then thread-level fallbacks (last-message snapshot, unread counter) for
/// conversations where the upstream omits stable ids. The fallbacks keep
/// re-notification idempotent even for the synthetic unread alert.
#[must_use]
pub fn message_key(chat: &ChatSummary, message: Option<&ChatMessage>) -> String {
    let token = message
        .and_then(|m| {
            m.id.map(|id| id.to_string())
                .or_else(|| m.written_at.clone())
        })
        .or_else(|| chat.last_message.clone())
        .or_else(|| chat.unread_count.map(|count| count.to_string()))
        .unwrap_or_else(|| "-".into());

    format!("{}:{token}", chat.id)
}

/// Dedup key for an order event.
#[must_use]
pub fn order_key(invoice_id: i64) -> String {
    invoice_id.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn chat(id: i64) -> ChatSummary {
        ChatSummary {
            id,
            buyer_email: Some("buyer@example.com".into()),
            product_id: Some(500),
            unread_count: Some(2),
            last_message: Some("2024-05-01 10:00:00".into()),
        }
    }

    fn msg() -> ChatMessage {
        ChatMessage {
            id: Some(9001),
            from_buyer: true,
            deleted: false,
            text: Some("hello".into()),
            written_at: Some("2024-05-01T10:00:00Z".into()),
        }
    }

    // ------------------------------------------------------------------
    // Key derivation
    // ------------------------------------------------------------------

    #[test]
    fn key_prefers_message_id() {
        assert_eq!(message_key(&chat(77), Some(&msg())), "77:9001");
    }

    #[test]
    fn key_falls_back_to_message_timestamp() {
        let mut m = msg();
        m.id = None;
        assert_eq!(message_key(&chat(77), Some(&m)), "77:2024-05-01T10:00:00Z");
    }

    #[test]
    fn key_falls_back_to_thread_snapshot_then_counter() {
        let mut c = chat(77);
        assert_eq!(message_key(&c, None), "77:2024-05-01 10:00:00");

        c.last_message = None;
        assert_eq!(message_key(&c, None), "77:2");

        c.unread_count = None;
        assert_eq!(message_key(&c, None), "77:-");
    }

    #[test]
    fn order_key_is_the_invoice_id() {
        assert_eq!(order_key(123_456), "123456");
    }

    // ------------------------------------------------------------------
    // Set semantics
    // ------------------------------------------------------------------

    #[test]
    fn insert_reports_new_exactly_once() {
        let seen = SeenSet::new();
        assert!(seen.insert("77:9001"));
        assert!(!seen.insert("77:9001"));
        assert_eq!(seen.len(), 1);
        assert!(seen.contains("77:9001"));
    }

    #[test]
    fn concurrent_inserts_of_one_key_yield_one_winner() {
        let seen = Arc::new(SeenSet::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let seen = Arc::clone(&seen);
            handles.push(std::thread::spawn(move || seen.insert("77:9001")));
        }

        let wins: usize = handles
            .into_iter()
            .map(|h| usize::from(h.join().unwrap()))
            .sum();

        assert_eq!(wins, 1);
        assert_eq!(seen.len(), 1);
    }
}
