//! Platform-agnostic domain types and pure check logic.

mod alert;
mod conversation;
mod order;
mod seen;

pub use alert::{escape_html, message_alert, order_alert, truncate, DASH};
pub use conversation::{latest_buyer_message, written_at_epoch, ChatMessage, ChatSummary};
pub use order::{OrderSummary, PurchaseDetail, SaleStub};
pub use seen::{message_key, order_key, SeenSet};
