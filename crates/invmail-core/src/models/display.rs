//! Display-ready invoice model consumed by templates and API clients.

use serde::{Deserialize, Serialize};

/// Fully defaulted and formatted invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDisplayModel {
    pub company_name: String,
    pub company_email: String,
    pub invoice_number: String,
    /// `YYYY-MM-DD` unless the caller supplied another format.
    pub issue_date: String,
    pub due_date: String,
    pub client_name: String,
    pub client_email: String,
    pub items: Vec<DisplayLineItem>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub notes: String,
}

/// A formatted line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLineItem {
    pub description: String,
    /// Plain number with two decimals, e.g. `2.00`.
    pub quantity: String,
    /// Currency string, e.g. `$350.00`.
    pub unit_price: String,
    pub line_total: String,
}
