//! Instruction records produced by the text parser.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured form of an instruction email.
///
/// Fields stay `None` unless the text set them; defaults are applied later
/// by the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_email: Option<String>,

    /// Tax rate as a fraction of one (0.15 for 15%).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Amount>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Line items in the order they appeared.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// A numeric value read from instruction text.
///
/// Serialized as a decimal string either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Value(Decimal),
    /// Numeric text too large for a decimal, kept verbatim so that
    /// normalization can reject it.
    OutOfRange(String),
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::Value(value)
    }
}

impl From<Amount> for Value {
    fn from(amount: Amount) -> Self {
        match amount {
            Amount::Value(value) => Value::String(value.to_string()),
            Amount::OutOfRange(text) => Value::String(text),
        }
    }
}

/// A billable line before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub quantity: Amount,
    pub unit_price: Amount,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: impl Into<Amount>,
        unit_price: impl Into<Amount>,
    ) -> Self {
        Self {
            description: description.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
        }
    }
}

/// Keys recognized on `key: value` instruction lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKey {
    /// A field stored as written.
    Text(TextField),
    /// The tax rate, which is parsed before it is stored.
    TaxRate,
}

/// Record fields that hold plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Company,
    CompanyEmail,
    InvoiceNumber,
    IssueDate,
    DueDate,
    ClientName,
    ClientEmail,
    Notes,
}

impl InstructionKey {
    /// Look up a key, ignoring case and surrounding whitespace.
    pub fn from_str(s: &str) -> Option<Self> {
        let field = match s.trim().to_lowercase().as_str() {
            "company" => TextField::Company,
            "company_email" => TextField::CompanyEmail,
            "invoice_number" => TextField::InvoiceNumber,
            "issue_date" => TextField::IssueDate,
            "due_date" => TextField::DueDate,
            "client_name" => TextField::ClientName,
            "client_email" => TextField::ClientEmail,
            "notes" => TextField::Notes,
            "tax_rate" => return Some(Self::TaxRate),
            _ => return None,
        };
        Some(Self::Text(field))
    }
}

impl InstructionRecord {
    /// Store a text field.
    pub fn set_text(&mut self, field: TextField, value: String) {
        let slot = match field {
            TextField::Company => &mut self.company_name,
            TextField::CompanyEmail => &mut self.company_email,
            TextField::InvoiceNumber => &mut self.invoice_number,
            TextField::IssueDate => &mut self.issue_date,
            TextField::DueDate => &mut self.due_date,
            TextField::ClientName => &mut self.client_name,
            TextField::ClientEmail => &mut self.client_email,
            TextField::Notes => &mut self.notes,
        };
        *slot = Some(value);
    }

    /// Check whether the record carries anything at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_lookup() {
        assert_eq!(
            InstructionKey::from_str("company"),
            Some(InstructionKey::Text(TextField::Company))
        );
        assert_eq!(
            InstructionKey::from_str("Client_Email"),
            Some(InstructionKey::Text(TextField::ClientEmail))
        );
        assert_eq!(InstructionKey::from_str(" TAX_RATE "), Some(InstructionKey::TaxRate));
        assert_eq!(InstructionKey::from_str("client name"), None);
        assert_eq!(InstructionKey::from_str("foo"), None);
    }

    #[test]
    fn test_set_text() {
        let mut record = InstructionRecord::default();
        record.set_text(TextField::Notes, "Net 30".to_string());
        record.set_text(TextField::DueDate, "2024-06-01".to_string());

        assert_eq!(record.notes.as_deref(), Some("Net 30"));
        assert_eq!(record.due_date.as_deref(), Some("2024-06-01"));
        assert_eq!(record.tax_rate, None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let record = InstructionRecord {
            client_name: Some("Acme Ops".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["clientName"], "Acme Ops");
        assert!(json.get("companyName").is_none());
    }

    #[test]
    fn test_amounts_serialize_as_text() {
        let huge = "1".repeat(30);
        let item = LineItem::new("X", Decimal::new(25, 1), Amount::OutOfRange(huge.clone()));
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["quantity"], "2.5");
        assert_eq!(json["unitPrice"], json!(huge));
        assert_eq!(Value::from(item.unit_price), json!(huge));
    }
}
