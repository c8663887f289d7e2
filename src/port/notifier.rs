//! Notification port: delivery of formatted alerts to a chat.

/// Delivery of formatted alert text to one chat.
///
/// Fire-and-forget: implementations must queue or send without blocking the
/// caller, and must swallow (log, not propagate) delivery failures so a
/// broken notification channel can never break a poll loop.
pub trait AlertSink: Send + Sync {
    fn deliver(&self, chat_id: i64, text: String);
}

/// Sink that discards everything. Useful where delivery is irrelevant, such
/// as one-shot scans that print instead of pushing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AlertSink for NullSink {
    fn deliver(&self, _chat_id: i64, _text: String) {}
}
