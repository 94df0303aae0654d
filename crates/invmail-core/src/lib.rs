//! Core library for email-driven invoicing.
//!
//! This crate provides:
//! - Line-oriented instruction parsing (`client_name: ...`, `item: ... | ... | ...`)
//! - Lenient amount coercion and tax-rate interpretation
//! - Invoice normalization with exact decimal totals
//! - HTML rendering through a Tera template

pub mod error;
pub mod invoice;
pub mod models;
pub mod render;

pub use error::{InvmailError, NormalizeError, NumberError, RenderError, Result};
pub use invoice::rules::{coerce_number, format_currency, parse_tax_rate};
pub use invoice::{
    normalize, parse_instructions, InstructionParser, InvoiceNormalizer, InvoiceTotals, ParseResult,
};
pub use models::{
    Amount, InstructionRecord, InvmailConfig, InvoiceDefaults, InvoiceDisplayModel, InvoiceInput,
    LineItem,
};
pub use render::{render_invoice_html, InvoiceRenderer};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
