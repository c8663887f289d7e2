//! Conversation summaries and message records from the seller platform.

use chrono::{DateTime, NaiveDateTime};

/// One conversation from the unread listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub id: i64,
    pub buyer_email: Option<String>,
    pub product_id: Option<i64>,
    pub unread_count: Option<i64>,
    /// Timestamp-ish snapshot of the latest activity, as the listing reports it.
    pub last_message: Option<String>,
}

/// One message inside a conversation thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Option<i64>,
    pub from_buyer: bool,
    pub deleted: bool,
    pub text: Option<String>,
    pub written_at: Option<String>,
}

/// Ordering value for a message timestamp.
///
/// Accepts ISO-8601 (offset or `Z`), a naive datetime treated as UTC, or a
/// raw numeric epoch. Absent or unparseable timestamps compare as negative
/// infinity so they rank last.
pub fn written_at_epoch(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return f64::NEG_INFINITY;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return f64::NEG_INFINITY;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp_millis() as f64 / 1000.0;
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.and_utc().timestamp_millis() as f64 / 1000.0;
        }
    }

    raw.parse::<f64>().unwrap_or(f64::NEG_INFINITY)
}

/// Select the latest non-deleted buyer message in a thread.
///
/// Thread order from the upstream is unreliable, so selection goes by
/// `written_at` rather than array position. Strictly-greater comparison:
/// among messages with equal (or unparseable) timestamps the first
/// encountered wins.
pub fn latest_buyer_message(messages: &[ChatMessage]) -> Option<&ChatMessage> {
    let mut latest: Option<&ChatMessage> = None;
    let mut latest_epoch = f64::NEG_INFINITY;

    for message in messages {
        if !message.from_buyer || message.deleted {
            continue;
        }
        let epoch = written_at_epoch(message.written_at.as_deref());
        if epoch > latest_epoch || latest.is_none() {
            latest_epoch = epoch;
            latest = Some(message);
        }
    }

    latest
}
