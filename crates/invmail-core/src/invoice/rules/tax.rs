//! Tax rate parsing.
//!
//! Rates are returned as a fraction of one (`0.15` for 15%). Authors write
//! `15%`, `15` and `0.15` interchangeably, so:
//!
//! - a trailing `%` always means "divide by 100";
//! - otherwise a value strictly greater than 1 is read as a whole-number
//!   percentage and divided by 100;
//! - anything else is already a fraction. A bare `1` therefore means 100%,
//!   not 1%.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::NumberError;

use super::numbers::{coerce_number, coerce_value};

/// Parse a tax rate from instruction text.
///
/// Unreadable text is a zero rate; a number outside the decimal range is
/// an error.
pub fn parse_tax_rate(raw: &str) -> Result<Decimal, NumberError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    if let Some(percent) = trimmed.strip_suffix('%') {
        return Ok(coerce_number(percent, Decimal::ZERO)? / Decimal::ONE_HUNDRED);
    }

    coerce_number(trimmed, Decimal::ZERO).map(whole_percent_to_fraction)
}

/// Parse a tax rate from a JSON value with the same rules as [`parse_tax_rate`].
pub fn parse_tax_rate_value(value: &Value) -> Result<Decimal, NumberError> {
    match value {
        Value::String(s) => parse_tax_rate(s),
        other => coerce_value(other, Decimal::ZERO).map(whole_percent_to_fraction),
    }
}

fn whole_percent_to_fraction(rate: Decimal) -> Decimal {
    if rate > Decimal::ONE {
        rate / Decimal::ONE_HUNDRED
    } else {
        rate
    }
}
