//! Invoice normalization: defaults, arithmetic and display formatting.

use chrono::{DateTime, Days, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::error::NormalizeError;
use crate::models::config::InvoiceDefaults;
use crate::models::display::{DisplayLineItem, InvoiceDisplayModel};
use crate::models::input::{InputItem, InvoiceInput};

use super::rules::{coerce_value, format_currency, format_quantity, DEFAULT_DESCRIPTION};
use super::Result;

/// Computes display-ready invoices from lenient input.
#[derive(Debug, Clone, Default)]
pub struct InvoiceNormalizer {
    defaults: InvoiceDefaults,
}

/// A line item after numeric coercion.
#[derive(Debug, Clone, PartialEq)]
struct PricedLine {
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    amount: Decimal,
}

/// Raw totals before formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl InvoiceNormalizer {
    /// Create a normalizer with the stock defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom fallback values.
    pub fn with_defaults(mut self, defaults: InvoiceDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Normalize using the current time for generated fields.
    pub fn normalize(&self, input: &InvoiceInput) -> Result<InvoiceDisplayModel> {
        self.normalize_at(input, Utc::now())
    }

    /// Normalize a raw JSON value, rejecting structurally invalid input.
    pub fn normalize_value(&self, value: Value) -> Result<InvoiceDisplayModel> {
        self.normalize(&InvoiceInput::from_value(value)?)
    }

    /// Normalize with an explicit clock reading. All generated fields
    /// (invoice number, issue and due dates) derive from `now`.
    pub fn normalize_at(&self, input: &InvoiceInput, now: DateTime<Utc>) -> Result<InvoiceDisplayModel> {
        let lines = price_lines(&input.items)?;
        let totals = compute_totals(&lines, coerce_amount(&input.tax_rate, "taxRate")?)?;

        debug!(
            "Normalized {} items: subtotal={} tax={} total={}",
            lines.len(),
            totals.subtotal,
            totals.tax,
            totals.total
        );

        let defaults = &self.defaults;
        let today = now.date_naive();
        let due = today
            .checked_add_days(Days::new(u64::from(defaults.payment_terms_days)))
            .unwrap_or(today);

        Ok(InvoiceDisplayModel {
            company_name: or_default(&input.company_name, &defaults.company_name),
            company_email: or_default(&input.company_email, &defaults.company_email),
            invoice_number: input
                .invoice_number
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| {
                    format!("{}{}", defaults.invoice_number_prefix, now.timestamp_millis())
                }),
            issue_date: input
                .issue_date
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
            due_date: input
                .due_date
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| due.format("%Y-%m-%d").to_string()),
            client_name: or_default(&input.client_name, &defaults.client_name),
            client_email: or_default(&input.client_email, &defaults.client_email),
            items: lines
                .into_iter()
                .map(|line| DisplayLineItem {
                    quantity: format_quantity(line.quantity),
                    unit_price: format_currency(line.unit_price),
                    line_total: format_currency(line.amount),
                    description: line.description,
                })
                .collect(),
            subtotal: format_currency(totals.subtotal),
            tax: format_currency(totals.tax),
            total: format_currency(totals.total),
            notes: or_default(&input.notes, &defaults.notes),
        })
    }

    /// Compute raw totals without formatting.
    pub fn totals(&self, input: &InvoiceInput) -> Result<InvoiceTotals> {
        let lines = price_lines(&input.items)?;
        compute_totals(&lines, coerce_amount(&input.tax_rate, "taxRate")?)
    }
}

fn or_default(value: &Option<String>, fallback: &str) -> String {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Coerce a raw amount with a zero fallback. Numbers too large for a
/// decimal are overflows, not zeros.
fn coerce_amount(value: &Value, field: &'static str) -> Result<Decimal> {
    coerce_value(value, Decimal::ZERO).map_err(|_| NormalizeError::Overflow { field })
}

/// Coerce each item; quantity and unit price fall back to zero here.
fn price_lines(items: &[InputItem]) -> Result<Vec<PricedLine>> {
    items
        .iter()
        .map(|item| {
            let quantity = coerce_amount(&item.quantity, "quantity")?;
            let unit_price = coerce_amount(&item.unit_price, "unitPrice")?;
            let amount = quantity
                .checked_mul(unit_price)
                .ok_or(NormalizeError::Overflow { field: "lineTotal" })?;

            Ok(PricedLine {
                description: item
                    .description
                    .clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
                quantity,
                unit_price,
                amount,
            })
        })
        .collect()
}

/// Sum line amounts left to right, then apply tax.
fn compute_totals(lines: &[PricedLine], tax_rate: Decimal) -> Result<InvoiceTotals> {
    let mut subtotal = Decimal::ZERO;
    for line in lines {
        subtotal = subtotal
            .checked_add(line.amount)
            .ok_or(NormalizeError::Overflow { field: "subtotal" })?;
    }

    let tax = subtotal
        .checked_mul(tax_rate)
        .ok_or(NormalizeError::Overflow { field: "tax" })?;
    let total = subtotal
        .checked_add(tax)
        .ok_or(NormalizeError::Overflow { field: "total" })?;

    Ok(InvoiceTotals { subtotal, tax, total })
}

/// Normalize with stock defaults and the current time.
pub fn normalize(input: &InvoiceInput) -> Result<InvoiceDisplayModel> {
    InvoiceNormalizer::new().normalize(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::parser::parse_instructions;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    fn input(value: Value) -> InvoiceInput {
        InvoiceInput::from_value(value).unwrap()
    }

    #[test]
    fn test_computes_totals() {
        let model = normalize(&input(json!({
            "items": [
                { "description": "A", "quantity": 1, "unitPrice": 100 },
                { "description": "B", "quantity": 2, "unitPrice": 50 }
            ],
            "taxRate": 0.1
        })))
        .unwrap();

        assert_eq!(model.subtotal, "$200.00");
        assert_eq!(model.tax, "$20.00");
        assert_eq!(model.total, "$220.00");
        assert_eq!(model.items[1].quantity, "2.00");
        assert_eq!(model.items[1].unit_price, "$50.00");
        assert_eq!(model.items[1].line_total, "$100.00");
    }

    #[test]
    fn test_defaults_for_empty_input() {
        let model = InvoiceNormalizer::new()
            .normalize_at(&InvoiceInput::default(), fixed_now())
            .unwrap();

        assert_eq!(
            model,
            InvoiceDisplayModel {
                company_name: "Sasinelwa Studio".to_string(),
                company_email: "billing@sasinelwa.com".to_string(),
                invoice_number: format!("INV-{}", fixed_now().timestamp_millis()),
                issue_date: "2024-05-01".to_string(),
                due_date: "2024-05-15".to_string(),
                client_name: "Client Name".to_string(),
                client_email: "client@example.com".to_string(),
                items: vec![],
                subtotal: "$0.00".to_string(),
                tax: "$0.00".to_string(),
                total: "$0.00".to_string(),
                notes: "Thank you for your business.".to_string(),
            }
        );
    }

    #[test]
    fn test_due_date_crosses_month() {
        let now = Utc.with_ymd_and_hms(2024, 12, 25, 23, 59, 0).unwrap();
        let model = InvoiceNormalizer::new()
            .normalize_at(&InvoiceInput::default(), now)
            .unwrap();
        assert_eq!(model.issue_date, "2024-12-25");
        assert_eq!(model.due_date, "2025-01-08");
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = InvoiceDefaults {
            company_name: "Acme Billing".to_string(),
            invoice_number_prefix: "ACME-".to_string(),
            payment_terms_days: 30,
            ..Default::default()
        };
        let model = InvoiceNormalizer::new()
            .with_defaults(defaults)
            .normalize_at(&InvoiceInput::default(), fixed_now())
            .unwrap();

        assert_eq!(model.company_name, "Acme Billing");
        assert!(model.invoice_number.starts_with("ACME-"));
        assert_eq!(model.due_date, "2024-05-31");
    }

    #[test]
    fn test_supplied_fields_are_kept() {
        let model = InvoiceNormalizer::new()
            .normalize_at(
                &input(json!({
                    "companyName": "Studio",
                    "invoiceNumber": "P00005402",
                    "issueDate": "May 1st",
                    "dueDate": "2024-06-01",
                    "notes": "Net 30"
                })),
                fixed_now(),
            )
            .unwrap();

        assert_eq!(model.company_name, "Studio");
        assert_eq!(model.invoice_number, "P00005402");
        assert_eq!(model.issue_date, "May 1st");
        assert_eq!(model.due_date, "2024-06-01");
        assert_eq!(model.notes, "Net 30");
    }

    #[test]
    fn test_item_coercion_falls_back_to_zero() {
        let model = normalize(&input(json!({
            "items": [
                { "quantity": "", "unitPrice": "abc" },
                { "description": "", "quantity": null },
                { "description": "Hosting", "quantity": "3", "unitPrice": "$9.99" }
            ]
        })))
        .unwrap();

        assert_eq!(model.items[0].description, "Service");
        assert_eq!(model.items[0].quantity, "0.00");
        assert_eq!(model.items[0].unit_price, "$0.00");
        assert_eq!(model.items[1].description, "Service");
        assert_eq!(model.items[2].line_total, "$29.97");
        assert_eq!(model.subtotal, "$29.97");
    }

    #[test]
    fn test_tax_rate_is_not_rescaled() {
        // Direct input takes the rate as a fraction; only instruction text
        // gets the whole-percent reading.
        let totals = InvoiceNormalizer::new()
            .totals(&input(json!({
                "items": [{ "quantity": 1, "unitPrice": 100 }],
                "taxRate": 15
            })))
            .unwrap();
        assert_eq!(totals.tax, Decimal::new(1500, 0));
    }

    #[test]
    fn test_negative_lines_are_credits() {
        let model = normalize(&input(json!({
            "items": [
                { "description": "Work", "quantity": 1, "unitPrice": 500 },
                { "description": "Discount", "quantity": -1, "unitPrice": 50 }
            ]
        })))
        .unwrap();

        assert_eq!(model.items[1].line_total, "-$50.00");
        assert_eq!(model.subtotal, "$450.00");
    }

    #[test]
    fn test_exact_decimal_arithmetic() {
        let totals = InvoiceNormalizer::new()
            .totals(&input(json!({
                "items": [
                    { "quantity": 1, "unitPrice": 0.1 },
                    { "quantity": 1, "unitPrice": 0.2 }
                ]
            })))
            .unwrap();
        assert_eq!(totals.subtotal, Decimal::new(3, 1));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = normalize(&input(json!({
            "items": [{ "quantity": "79228162514264337593543950335", "unitPrice": 10 }]
        })))
        .unwrap_err();
        assert_eq!(err, NormalizeError::Overflow { field: "lineTotal" });
    }

    #[test]
    fn test_oversized_inputs_are_overflows() {
        let err = normalize(&input(json!({
            "items": [{ "quantity": 1, "unitPrice": 1e30 }]
        })))
        .unwrap_err();
        assert_eq!(err, NormalizeError::Overflow { field: "unitPrice" });

        let err = normalize(&input(json!({
            "items": [{ "quantity": "$1000000000000000000000000000000", "unitPrice": 1 }]
        })))
        .unwrap_err();
        assert_eq!(err, NormalizeError::Overflow { field: "quantity" });

        let err = normalize(&input(json!({
            "items": [{ "quantity": 1, "unitPrice": 1 }],
            "taxRate": "1e40"
        })))
        .unwrap_err();
        assert_eq!(err, NormalizeError::Overflow { field: "taxRate" });
    }

    #[test]
    fn test_product_overflow_is_reported() {
        let err = normalize(&input(json!({
            "items": [{ "quantity": 1e15, "unitPrice": 1e15 }]
        })))
        .unwrap_err();
        assert_eq!(err, NormalizeError::Overflow { field: "lineTotal" });
    }

    #[test]
    fn test_oversized_instruction_amounts_are_overflows() {
        let record = parse_instructions(&format!("item: Mainframe | 1 | {}", "1".repeat(30)));
        let err = InvoiceNormalizer::new()
            .normalize_at(&InvoiceInput::from(record), fixed_now())
            .unwrap_err();
        assert_eq!(err, NormalizeError::Overflow { field: "unitPrice" });

        let record = parse_instructions("item: Audit | 1 | 100\ntax_rate: 1e40%");
        let err = InvoiceNormalizer::new()
            .totals(&InvoiceInput::from(record))
            .unwrap_err();
        assert_eq!(err, NormalizeError::Overflow { field: "taxRate" });
    }

    #[test]
    fn test_structural_errors() {
        let normalizer = InvoiceNormalizer::new();
        assert!(matches!(
            normalizer.normalize_value(json!({ "items": 5 })),
            Err(NormalizeError::Structure(_))
        ));
        assert!(matches!(
            normalizer.normalize_value(json!("text")),
            Err(NormalizeError::Structure(_))
        ));
    }

    #[test]
    fn test_parsed_instructions_normalize() {
        let record = parse_instructions(
            "client_name: Acme Ops\nitem: Design cleanup | 1 | 1200\nitem: Automation setup | 2 | 350\ntax_rate: 15%",
        );
        let model = InvoiceNormalizer::new()
            .normalize_at(&InvoiceInput::from(record), fixed_now())
            .unwrap();

        assert_eq!(model.client_name, "Acme Ops");
        assert_eq!(model.items[0].unit_price, "$1,200.00");
        assert_eq!(model.subtotal, "$1,900.00");
        assert_eq!(model.tax, "$285.00");
        assert_eq!(model.total, "$2,185.00");
    }

    #[test]
    fn test_renormalizing_is_stable() {
        let source = input(json!({
            "invoiceNumber": "X-1",
            "issueDate": "2024-01-01",
            "dueDate": "2024-01-15",
            "items": [{ "description": "A", "quantity": 1.5, "unitPrice": 19.99 }],
            "taxRate": 0.0825
        }));
        let normalizer = InvoiceNormalizer::new();

        let first = normalizer.normalize(&source).unwrap();
        let second = normalizer.normalize(&source).unwrap();
        assert_eq!(first, second);
    }
}
