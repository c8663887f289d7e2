//! Wire types for the seller API.
//!
//! Field names follow the upstream JSON exactly (`id_i`, `cnt_new`,
//! `date_written`, ...). Everything optional and defaulted: the API omits
//! fields freely, and a half-filled record must still deserialize so the
//! domain layer can decide what to do with it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, ChatSummary, PurchaseDetail, SaleStub};

/// Body for `POST apilogin`.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub seller_id: i64,
    pub timestamp: String,
    pub sign: String,
}

/// Response from `POST apilogin`.
///
/// ```json
/// {"retval":0,"token":"...","valid_thru":"2024-05-01T12:00:00Z"}
/// ```
///
/// On rejection the body carries `desc` and/or `retdesc` instead of a token.
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub valid_thru: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub retdesc: Option<String>,
}

impl LoginResponse {
    /// Server-supplied denial reason, for error messages.
    #[must_use]
    pub fn denial_reason(&self) -> String {
        self.desc
            .clone()
            .or_else(|| self.retdesc.clone())
            .unwrap_or_else(|| "—".into())
    }
}

/// Page of conversations from `GET debates/v2/chats`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatsPage {
    #[serde(default)]
    pub items: Vec<ChatItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatItem {
    #[serde(default)]
    pub id_i: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub product: Option<i64>,
    #[serde(default)]
    pub cnt_new: Option<i64>,
    #[serde(default)]
    pub last_message: Option<String>,
}

impl ChatItem {
    /// Conversations without an id cannot be fetched or keyed; drop them.
    #[must_use]
    pub fn into_summary(self) -> Option<ChatSummary> {
        Some(ChatSummary {
            id: self.id_i?,
            buyer_email: self.email,
            product_id: self.product,
            unread_count: self.cnt_new,
            last_message: self.last_message,
        })
    }
}

/// One message from `GET debates/v2` (the endpoint returns a bare array).
#[derive(Debug, Clone, Deserialize)]
pub struct MessageItem {
    #[serde(default)]
    pub id: Option<i64>,
    /// 1 when written by the buyer.
    #[serde(default)]
    pub buyer: Option<i64>,
    /// 1 when the message was removed.
    #[serde(default)]
    pub deleted: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub date_written: Option<String>,
    /// Some responses carry this instead of `date_written`.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl MessageItem {
    #[must_use]
    pub fn into_message(self) -> ChatMessage {
        ChatMessage {
            id: self.id,
            from_buyer: self.buyer.unwrap_or(0) == 1,
            deleted: self.deleted.unwrap_or(0) == 1,
            text: self.message,
            written_at: self.date_written.or(self.created_at),
        }
    }
}

/// Response from `GET seller-last-sales`.
#[derive(Debug, Default, Deserialize)]
pub struct SalesResponse {
    #[serde(default)]
    pub sales: Vec<SaleItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaleItem {
    #[serde(default)]
    pub invoice_id: Option<i64>,
    #[serde(default)]
    pub product: Option<SaleProduct>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleProduct {
    #[serde(default)]
    pub name: Option<String>,
}

impl SaleItem {
    #[must_use]
    pub fn into_stub(self) -> SaleStub {
        SaleStub {
            invoice_id: self.invoice_id,
            product_name: self.product.and_then(|p| p.name),
            date: self.date,
        }
    }
}

/// Response from `GET purchase/info/{invoice}`.
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseInfo {
    #[serde(default)]
    pub content: Option<PurchaseContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseContent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency_type: Option<String>,
    #[serde(default)]
    pub date_pay: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub buyer_info: Option<BuyerInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuyerInfo {
    #[serde(default)]
    pub email: Option<String>,
}

impl PurchaseInfo {
    /// Flatten into the domain record; an absent `content` becomes an empty
    /// detail (which the paid filter then rejects).
    #[must_use]
    pub fn into_detail(self) -> PurchaseDetail {
        let content = self.content.unwrap_or_default();
        PurchaseDetail {
            name: content.name,
            amount: content.amount,
            currency: content.currency_type,
            date_pay: content.date_pay,
            status: content.status,
            purchase_date: content.purchase_date,
            buyer_email: content.buyer_info.and_then(|b| b.email),
        }
    }
}
