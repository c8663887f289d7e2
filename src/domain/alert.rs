//! Alert text composition.
//!
//! Pure string building for Telegram HTML. Never fails on absent fields;
//! anything missing renders as a dash.

use super::conversation::{ChatMessage, ChatSummary};
use super::order::OrderSummary;

/// Placeholder for absent upstream values.
pub const DASH: &str = "—";

/// Escape text for interpolation into Telegram HTML.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Truncate to a maximum number of characters, appending an ellipsis.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max_chars).collect();
    format!("{truncated}...")
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => escape_html(v),
        _ => DASH.to_string(),
    }
}

/// Alert for an unread conversation.
///
/// With a selected buyer message the alert carries its text and timestamp;
/// without one it degrades to a synthetic summary built from the unread
/// counter and the thread's last-activity snapshot, so a flagged-unread
/// conversation is never dropped silently.
pub fn message_alert(chat: &ChatSummary, message: Option<&ChatMessage>) -> String {
    let email = or_dash(chat.buyer_email.as_deref());
    let product = match chat.product_id {
        Some(id) => format!("product #{id}"),
        None => DASH.to_string(),
    };

    let text = match message.and_then(|m| m.text.as_deref()) {
        Some(text) => escape_html(text),
        None => {
            let count = chat
                .unread_count
                .map(|c| c.to_string())
                .unwrap_or_else(|| DASH.to_string());
            format!("New messages: {count}")
        }
    };
    let written_at = message
        .and_then(|m| m.written_at.as_deref())
        .or(chat.last_message.as_deref());

    format!(
        "💬 New message from <b>{email}</b>\n\
         🗂️ Conversation #{id} — <i>{product}</i>\n\
         🕒 {written_at}\n\
         💭 <code>{text}</code>",
        id = chat.id,
        written_at = or_dash(written_at),
    )
}

/// Alert for a confirmed-paid order.
pub fn order_alert(order: &OrderSummary) -> String {
    let amount = match order.amount {
        Some(amount) => {
            let currency = order.currency.as_deref().unwrap_or("").trim().to_string();
            if currency.is_empty() {
                amount.to_string()
            } else {
                format!("{amount} {}", escape_html(&currency))
            }
        }
        None => DASH.to_string(),
    };

    format!(
        "🧾 New order №<b>{invoice}</b>\n\
         📦 Item: <i>{title}</i>\n\
         📧 Buyer: <code>{email}</code>\n\
         💰 Amount: <b>{amount}</b>\n\
         📌 Status: <b>{status}</b>\n\
         🕒 {created_at}",
        invoice = order.invoice_id,
        title = or_dash(order.title.as_deref()),
        email = or_dash(order.buyer_email.as_deref()),
        status = escape_html(&order.status),
        created_at = or_dash(order.created_at.as_deref()),
    )
}
