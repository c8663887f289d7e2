//! Recording [`AlertSink`] double.

use parking_lot::Mutex;

use crate::port::AlertSink;

/// Sink that remembers every delivery. Share it via `Arc` and read back
/// with [`RecordingSink::sent`].
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, as `(chat_id, text)` in order.
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().clone()
    }

    /// Texts delivered to one chat, in order.
    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl AlertSink for RecordingSink {
    fn deliver(&self, chat_id: i64, text: String) {
        self.sent.lock().push((chat_id, text));
    }
}
