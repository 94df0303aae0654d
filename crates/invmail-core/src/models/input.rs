//! Lenient invoice input accepted by the normalizer.
//!
//! This is the shape of both a parsed [`InstructionRecord`] and the JSON or
//! form bodies posted to the generate endpoint. String fields take any
//! scalar, numeric fields keep their raw JSON value until normalization.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::error::NormalizeError;
use crate::models::instruction::InstructionRecord;

/// Invoice data as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceInput {
    #[serde(
        alias = "company",
        alias = "company_name",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_name: Option<String>,

    #[serde(
        alias = "company_email",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_email: Option<String>,

    #[serde(
        alias = "invoice_number",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub invoice_number: Option<String>,

    #[serde(
        alias = "issue_date",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub issue_date: Option<String>,

    #[serde(
        alias = "due_date",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<String>,

    #[serde(
        alias = "client_name",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_name: Option<String>,

    #[serde(
        alias = "client_email",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_email: Option<String>,

    /// Raw tax rate; coerced to a fraction during normalization.
    #[serde(alias = "tax_rate", skip_serializing_if = "Value::is_null")]
    pub tax_rate: Value,

    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(deserialize_with = "nullable_items")]
    pub items: Vec<InputItem>,
}

/// A line item as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputItem {
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Value::is_null")]
    pub quantity: Value,

    #[serde(alias = "unit_price", alias = "price", skip_serializing_if = "Value::is_null")]
    pub unit_price: Value,
}

/// Accept strings, numbers and booleans as text; `null`, `false` and the
/// empty string count as absent.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Bool(true) => Ok(Some("true".to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(D::Error::custom(format!(
            "expected text, found {}",
            value_kind(&other)
        ))),
    }
}

/// `items` may be missing or null; anything but an array is rejected, and
/// so is any entry that is not an object (`null` entries included).
fn nullable_items<'de, D>(deserializer: D) -> std::result::Result<Vec<InputItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<InputItem>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl InvoiceInput {
    /// Build input from an arbitrary JSON value, rejecting anything that is
    /// not shaped like an invoice.
    pub fn from_value(value: Value) -> std::result::Result<Self, NormalizeError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| NormalizeError::Structure(e.to_string())),
            other => Err(NormalizeError::Structure(format!(
                "invoice input must be an object, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Parse input from a JSON document.
    pub fn from_json(text: &str) -> std::result::Result<Self, NormalizeError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| NormalizeError::Structure(e.to_string()))?;
        Self::from_value(value)
    }

    /// Sample invoice used by the preview page.
    pub fn preview_sample() -> Self {
        Self {
            invoice_number: Some("P00005402".to_string()),
            client_name: Some("Acme Ops".to_string()),
            client_email: Some("ops@acme.com".to_string()),
            tax_rate: json!(0.15),
            notes: Some("Please pay within 14 days.".to_string()),
            items: vec![
                InputItem {
                    description: Some("Design cleanup".to_string()),
                    quantity: json!(1),
                    unit_price: json!(1200),
                },
                InputItem {
                    description: Some("Automation setup".to_string()),
                    quantity: json!(2),
                    unit_price: json!(350),
                },
            ],
            ..Default::default()
        }
    }
}

impl From<InstructionRecord> for InvoiceInput {
    fn from(record: InstructionRecord) -> Self {
        let text = |field: Option<String>| field.filter(|s| !s.is_empty());

        Self {
            company_name: text(record.company_name),
            company_email: text(record.company_email),
            invoice_number: text(record.invoice_number),
            issue_date: text(record.issue_date),
            due_date: text(record.due_date),
            client_name: text(record.client_name),
            client_email: text(record.client_email),
            tax_rate: record
                .tax_rate
                .map_or(Value::Null, Value::from),
            notes: text(record.notes),
            items: record
                .items
                .into_iter()
                .map(|item| InputItem {
                    description: Some(item.description).filter(|s| !s.is_empty()),
                    quantity: item.quantity.into(),
                    unit_price: item.unit_price.into(),
                })
                .collect(),
        }
    }
}
