//! Marketplace port: read-only access to the seller platform.

use async_trait::async_trait;

use crate::domain::{ChatMessage, ChatSummary, PurchaseDetail, SaleStub};
use crate::error::Result;

/// Per-endpoint HTTP statuses from a diagnostics probe. `0` means the
/// request never produced a status (transport failure).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiProbe {
    pub login: u16,
    pub chats: u16,
    pub sales: u16,
}

impl ApiProbe {
    /// All probed endpoints answered 200.
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.login == 200 && self.chats == 200 && self.sales == 200
    }
}

/// Read access to the seller platform's conversation and sales surface.
///
/// Implementations own authentication; callers never see tokens.
#[async_trait]
pub trait Marketplace: Send + Sync {
    /// List conversations, optionally restricted to those with unread
    /// messages.
    async fn list_chats(
        &self,
        unread_only: bool,
        page: u32,
        pagesize: u32,
    ) -> Result<Vec<ChatSummary>>;

    /// List messages for one conversation. `count` is clamped to the
    /// upstream's 1..=100 window; `newer_than` restricts to messages after
    /// the given cursor.
    async fn list_messages(
        &self,
        conversation_id: i64,
        count: u32,
        newer_than: Option<i64>,
    ) -> Result<Vec<ChatMessage>>;

    /// Most recent sales, newest first, at most `top` entries.
    async fn last_sales(&self, top: u32) -> Result<Vec<SaleStub>>;

    /// Full purchase record for one invoice.
    async fn purchase_detail(&self, invoice_id: i64) -> Result<PurchaseDetail>;

    /// Probe login and the primary listing endpoints, reporting raw HTTP
    /// statuses without failing.
    async fn probe(&self) -> ApiProbe;
}
