//! Scripted [`Marketplace`] double.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{ChatMessage, ChatSummary, PurchaseDetail, SaleStub};
use crate::error::{Error, Result};
use crate::port::{ApiProbe, Marketplace};

/// A [`Marketplace`] with fixed responses, per-endpoint failure switches,
/// and call recording.
///
/// `list_messages` serves the first `count` entries of the conversation's
/// scripted history, so tests can drive the cheap-probe-then-refetch path
/// by putting the interesting message beyond the probe window.
#[derive(Default)]
pub struct ScriptedMarketplace {
    chats: Mutex<Vec<ChatSummary>>,
    messages: Mutex<HashMap<i64, Vec<ChatMessage>>>,
    sales: Mutex<Vec<SaleStub>>,
    details: Mutex<HashMap<i64, PurchaseDetail>>,
    probe: Mutex<ApiProbe>,

    chats_failing: AtomicBool,
    sales_failing: AtomicBool,
    failing_conversations: Mutex<HashSet<i64>>,
    failing_details: Mutex<HashSet<i64>>,

    chat_calls: AtomicU32,
    sales_calls: AtomicU32,
    probe_calls: AtomicU32,
    message_requests: Mutex<Vec<(i64, u32)>>,
    detail_requests: Mutex<Vec<i64>>,
}

impl ScriptedMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------

    pub fn with_chats(self, chats: Vec<ChatSummary>) -> Self {
        *self.chats.lock() = chats;
        self
    }

    pub fn with_messages(self, conversation_id: i64, messages: Vec<ChatMessage>) -> Self {
        self.messages.lock().insert(conversation_id, messages);
        self
    }

    pub fn with_sales(self, sales: Vec<SaleStub>) -> Self {
        *self.sales.lock() = sales;
        self
    }

    pub fn with_detail(self, invoice_id: i64, detail: PurchaseDetail) -> Self {
        self.details.lock().insert(invoice_id, detail);
        self
    }

    pub fn with_probe(self, probe: ApiProbe) -> Self {
        *self.probe.lock() = probe;
        self
    }

    // -----------------------------------------------------------------
    // Mid-test mutation
    // -----------------------------------------------------------------

    pub fn set_chats(&self, chats: Vec<ChatSummary>) {
        *self.chats.lock() = chats;
    }

    pub fn set_messages(&self, conversation_id: i64, messages: Vec<ChatMessage>) {
        self.messages.lock().insert(conversation_id, messages);
    }

    pub fn set_detail(&self, invoice_id: i64, detail: PurchaseDetail) {
        self.details.lock().insert(invoice_id, detail);
    }

    pub fn fail_chats(&self, failing: bool) {
        self.chats_failing.store(failing, Ordering::SeqCst);
    }

    pub fn fail_sales(&self, failing: bool) {
        self.sales_failing.store(failing, Ordering::SeqCst);
    }

    pub fn fail_conversation(&self, conversation_id: i64) {
        self.failing_conversations.lock().insert(conversation_id);
    }

    pub fn fail_detail(&self, invoice_id: i64) {
        self.failing_details.lock().insert(invoice_id);
    }

    // -----------------------------------------------------------------
    // Recorded calls
    // -----------------------------------------------------------------

    pub fn chat_calls(&self) -> u32 {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn sales_calls(&self) -> u32 {
        self.sales_calls.load(Ordering::SeqCst)
    }

    pub fn probe_calls(&self) -> u32 {
        self.probe_calls.load(Ordering::SeqCst)
    }

    /// Every `list_messages` call as `(conversation_id, requested_count)`.
    pub fn message_requests(&self) -> Vec<(i64, u32)> {
        self.message_requests.lock().clone()
    }

    /// Every `purchase_detail` call's invoice id, in order.
    pub fn detail_requests(&self) -> Vec<i64> {
        self.detail_requests.lock().clone()
    }
}

#[async_trait]
impl Marketplace for ScriptedMarketplace {
    async fn list_chats(
        &self,
        _unread_only: bool,
        _page: u32,
        _pagesize: u32,
    ) -> Result<Vec<ChatSummary>> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        if self.chats_failing.load(Ordering::SeqCst) {
            return Err(Error::Runtime("scripted conversation listing failure".into()));
        }
        Ok(self.chats.lock().clone())
    }

    async fn list_messages(
        &self,
        conversation_id: i64,
        count: u32,
        _newer_than: Option<i64>,
    ) -> Result<Vec<ChatMessage>> {
        self.message_requests.lock().push((conversation_id, count));
        if self.failing_conversations.lock().contains(&conversation_id) {
            return Err(Error::Runtime("scripted message fetch failure".into()));
        }
        let messages = self
            .messages
            .lock()
            .get(&conversation_id)
            .cloned()
            .unwrap_or_default();
        Ok(messages.into_iter().take(count as usize).collect())
    }

    async fn last_sales(&self, top: u32) -> Result<Vec<SaleStub>> {
        self.sales_calls.fetch_add(1, Ordering::SeqCst);
        if self.sales_failing.load(Ordering::SeqCst) {
            return Err(Error::Runtime("scripted sales listing failure".into()));
        }
        Ok(self.sales.lock().iter().take(top as usize).cloned().collect())
    }

    async fn purchase_detail(&self, invoice_id: i64) -> Result<PurchaseDetail> {
        self.detail_requests.lock().push(invoice_id);
        if self.failing_details.lock().contains(&invoice_id) {
            return Err(Error::Runtime("scripted detail fetch failure".into()));
        }
        // Missing script entry behaves like an upstream reply without
        // `content`: an all-empty, unpaid detail.
        Ok(self
            .details
            .lock()
            .get(&invoice_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn probe(&self) -> ApiProbe {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        *self.probe.lock()
    }
}
