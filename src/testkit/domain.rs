//! Builders for domain primitives used across tests.

use crate::domain::{ChatMessage, ChatSummary, PurchaseDetail, SaleStub};

/// Unread conversation with one flagged message and a plausible snapshot.
pub fn chat(id: i64) -> ChatSummary {
    ChatSummary {
        id,
        buyer_email: Some(format!("buyer{id}@example.com")),
        product_id: Some(500 + id),
        unread_count: Some(1),
        last_message: Some("2024-05-01T10:00:00".into()),
    }
}

pub fn buyer_message(id: i64, text: &str, written_at: &str) -> ChatMessage {
    ChatMessage {
        id: Some(id),
        from_buyer: true,
        deleted: false,
        text: Some(text.into()),
        written_at: Some(written_at.into()),
    }
}

pub fn seller_message(id: i64, text: &str, written_at: &str) -> ChatMessage {
    ChatMessage {
        from_buyer: false,
        ..buyer_message(id, text, written_at)
    }
}

pub fn deleted_buyer_message(id: i64, text: &str, written_at: &str) -> ChatMessage {
    ChatMessage {
        deleted: true,
        ..buyer_message(id, text, written_at)
    }
}

pub fn sale(invoice_id: i64, product_name: &str) -> SaleStub {
    SaleStub {
        invoice_id: Some(invoice_id),
        product_name: Some(product_name.into()),
        date: Some("2024-05-01T12:00:00".into()),
    }
}

/// Sale record the upstream returns before an invoice exists.
pub fn invoiceless_sale(product_name: &str) -> SaleStub {
    SaleStub {
        invoice_id: None,
        product_name: Some(product_name.into()),
        date: Some("2024-05-01T12:00:00".into()),
    }
}

pub fn paid_detail(name: &str) -> PurchaseDetail {
    PurchaseDetail {
        name: Some(name.into()),
        amount: None,
        currency: Some("USD".into()),
        date_pay: Some("2024-05-01T12:03:00".into()),
        status: Some("paid".into()),
        purchase_date: Some("2024-05-01T12:00:00".into()),
        buyer_email: Some("payer@example.com".into()),
    }
}

/// Detail for an order that has not been paid yet (everything absent).
pub fn unpaid_detail() -> PurchaseDetail {
    PurchaseDetail::default()
}
