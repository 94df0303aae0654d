//! Value-level rules: numeric coercion, tax rates and display formatting.

pub mod currency;
pub mod numbers;
pub mod patterns;
pub mod tax;

pub use currency::{format_currency, format_quantity};
pub use numbers::{clean_numeric_text, coerce_number, coerce_value, parse_decimal};
pub use tax::{parse_tax_rate, parse_tax_rate_value};

use rust_decimal::Decimal;

/// Quantity used when an `item:` line gives none or an unreadable one.
pub const ITEM_QUANTITY_FALLBACK: Decimal = Decimal::ONE;

/// Unit price used when an `item:` line gives none or an unreadable one.
pub const ITEM_PRICE_FALLBACK: Decimal = Decimal::ZERO;

/// Description used for items without one.
pub const DEFAULT_DESCRIPTION: &str = "Service";
