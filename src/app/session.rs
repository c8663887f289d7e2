//! Per-chat watch sessions.

use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::SeenSet;

/// Dedup state for one Telegram chat.
///
/// The two seen-sets are deliberately separate: message keys and order keys
/// live in different namespaces, and a manual message check must be able to
/// bypass `seen_messages` while a manual order check shares `seen_orders`
/// with the background job.
pub struct ChatSession {
    pub chat_id: i64,
    pub seen_messages: SeenSet,
    pub seen_orders: SeenSet,
}

impl ChatSession {
    #[must_use]
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            seen_messages: SeenSet::new(),
            seen_orders: SeenSet::new(),
        }
    }
}

/// Every chat that ever started a watch, keyed by chat id.
///
/// Lookup is get-or-create, so restarting a watch reuses the existing
/// session and its seen state instead of resetting it.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<i64, Arc<ChatSession>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self, chat_id: i64) -> Arc<ChatSession> {
        self.sessions
            .entry(chat_id)
            .or_insert_with(|| Arc::new(ChatSession::new(chat_id)))
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
