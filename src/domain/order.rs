//! Sales and purchase records from the seller platform.

use rust_decimal::Decimal;

/// Sale stub from the recent-sales listing. Carries just enough to decide
/// whether the full purchase detail is worth fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleStub {
    pub invoice_id: Option<i64>,
    pub product_name: Option<String>,
    pub date: Option<String>,
}

/// Full purchase detail for one invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseDetail {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub date_pay: Option<String>,
    pub status: Option<String>,
    pub purchase_date: Option<String>,
    pub buyer_email: Option<String>,
}

impl PurchaseDetail {
    /// Payment is confirmed when a payment date is present, or the upstream
    /// marks the purchase "paid" outright.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.date_pay
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
            || self
                .status
                .as_deref()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case("paid"))
    }
}

/// A confirmed-paid order ready for alerting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub invoice_id: i64,
    pub title: Option<String>,
    pub buyer_email: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub status: String,
    pub created_at: Option<String>,
}

impl OrderSummary {
    /// Merge a sale stub with its purchase detail. `None` when the stub has
    /// no invoice id, which also means there is nothing to key dedup on.
    #[must_use]
    pub fn from_sale(stub: &SaleStub, detail: &PurchaseDetail) -> Option<Self> {
        let invoice_id = stub.invoice_id?;
        Some(Self {
            invoice_id,
            title: detail.name.clone().or_else(|| stub.product_name.clone()),
            buyer_email: detail.buyer_email.clone(),
            amount: detail.amount,
            currency: detail.currency.clone(),
            status: detail.status.clone().unwrap_or_else(|| "paid".into()),
            created_at: detail.purchase_date.clone().or_else(|| stub.date.clone()),
        })
    }
}
