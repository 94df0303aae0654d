//! Lenient numeric coercion for human-authored amounts.
//!
//! Text that does not look like a number yields the caller's fallback.
//! Text that is a number too large for [`Decimal`] is reported as
//! [`NumberError::OutOfRange`] instead, so it never masquerades as a zero.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::error::NumberError;

use super::patterns::{DECIMAL_LITERAL, NUMERIC_NOISE};

/// Largest exponent magnitude worth scaling; anything beyond leaves the
/// decimal range in one direction or rounds to zero in the other.
const MAX_EXPONENT: u32 = 56;

/// Parse a clean decimal literal (`"12.5"`, `"-.5"`, `"3."`, `"1e3"`).
///
/// No symbols or whitespace are stripped; see [`coerce_number`] for that.
pub fn parse_decimal(text: &str) -> Result<Decimal, NumberError> {
    let caps = DECIMAL_LITERAL.captures(text).ok_or(NumberError::Invalid)?;
    let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
    let integer = caps.get(2).map_or("", |m| m.as_str());
    let fraction = caps.get(3).map_or("", |m| m.as_str());

    if integer.is_empty() && fraction.is_empty() {
        return Err(NumberError::Invalid);
    }

    let mut mantissa = String::with_capacity(text.len() + 2);
    if negative {
        mantissa.push('-');
    }
    mantissa.push_str(if integer.is_empty() { "0" } else { integer });
    if !fraction.is_empty() {
        mantissa.push('.');
        mantissa.push_str(fraction);
    }
    // The literal is well formed, so a failure here means too many digits.
    let value = Decimal::from_str(&mantissa).map_err(|_| NumberError::OutOfRange)?;

    match caps.get(4) {
        Some(exp) => scale_by_power_of_ten(value, exp.as_str()),
        None => Ok(value),
    }
}

fn scale_by_power_of_ten(value: Decimal, exp: &str) -> Result<Decimal, NumberError> {
    let shrinking = exp.starts_with('-');
    if value.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let magnitude = match exp.trim_start_matches(['+', '-']).parse::<u32>() {
        Ok(m) if m <= MAX_EXPONENT => m,
        _ if shrinking => return Ok(Decimal::ZERO),
        _ => return Err(NumberError::OutOfRange),
    };

    let mut scaled = value;
    for _ in 0..magnitude {
        let next = if shrinking {
            scaled.checked_div(Decimal::TEN)
        } else {
            scaled.checked_mul(Decimal::TEN)
        };
        scaled = next.ok_or(NumberError::OutOfRange)?;
    }
    Ok(scaled)
}

/// Strip currency symbols, percent signs and whitespace.
pub fn clean_numeric_text(raw: &str) -> String {
    NUMERIC_NOISE.replace_all(raw, "").into_owned()
}

/// Coerce free text to a number, returning `fallback` when it does not parse.
///
/// `"$1 200"` becomes `1200`, `"15%"` becomes `15`, `""` and `"abc"` become
/// `fallback`. A number too large to represent is an error, never the
/// fallback.
pub fn coerce_number(raw: &str, fallback: Decimal) -> Result<Decimal, NumberError> {
    match parse_decimal(&clean_numeric_text(raw)) {
        Err(NumberError::Invalid) => Ok(fallback),
        parsed => parsed,
    }
}

/// Coerce a JSON value to a number.
///
/// Numbers pass through unchanged, strings go through [`coerce_number`],
/// everything else (null, booleans, arrays, objects) yields `fallback`.
pub fn coerce_value(value: &Value, fallback: Decimal) -> Result<Decimal, NumberError> {
    match value {
        Value::Number(n) => match parse_decimal(&n.to_string()) {
            Err(NumberError::Invalid) => Ok(fallback),
            parsed => parsed,
        },
        Value::String(s) => coerce_number(s, fallback),
        _ => Ok(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(parse_decimal("1200"), Ok(dec("1200")));
        assert_eq!(parse_decimal("12.50"), Ok(dec("12.5")));
        assert_eq!(parse_decimal("-.5"), Ok(dec("-0.5")));
        assert_eq!(parse_decimal("3."), Ok(dec("3")));
        assert_eq!(parse_decimal("+7"), Ok(dec("7")));
        assert_eq!(parse_decimal("1e3"), Ok(dec("1000")));
        assert_eq!(parse_decimal("2.5E-2"), Ok(dec("0.025")));
        assert_eq!(parse_decimal("1e-999"), Ok(Decimal::ZERO));
        assert_eq!(parse_decimal("0e999"), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert_eq!(parse_decimal(""), Err(NumberError::Invalid));
        assert_eq!(parse_decimal("."), Err(NumberError::Invalid));
        assert_eq!(parse_decimal("-"), Err(NumberError::Invalid));
        assert_eq!(parse_decimal("1,200"), Err(NumberError::Invalid));
        assert_eq!(parse_decimal("abc"), Err(NumberError::Invalid));
        assert_eq!(parse_decimal("Infinity"), Err(NumberError::Invalid));
    }

    #[test]
    fn test_parse_decimal_out_of_range() {
        let thirty_digits = format!("1{}", "0".repeat(29));
        assert_eq!(parse_decimal(&thirty_digits), Err(NumberError::OutOfRange));
        assert_eq!(parse_decimal("1e30"), Err(NumberError::OutOfRange));
        assert_eq!(parse_decimal("-1e30"), Err(NumberError::OutOfRange));
        assert_eq!(parse_decimal("1e999"), Err(NumberError::OutOfRange));
        assert_eq!(parse_decimal("1e99999999999"), Err(NumberError::OutOfRange));
        assert_eq!(
            parse_decimal("79228162514264337593543950335"),
            Ok(Decimal::MAX)
        );
    }

    #[test]
    fn test_coerce_number_strips_symbols() {
        assert_eq!(coerce_number("$1200", Decimal::ZERO), Ok(dec("1200")));
        assert_eq!(coerce_number(" $ 1 200.50 ", Decimal::ZERO), Ok(dec("1200.5")));
        assert_eq!(coerce_number("15%", Decimal::ZERO), Ok(dec("15")));
        assert_eq!(coerce_number("-$20", Decimal::ZERO), Ok(dec("-20")));
    }

    #[test]
    fn test_coerce_number_fallback() {
        assert_eq!(coerce_number("", Decimal::ONE), Ok(Decimal::ONE));
        assert_eq!(coerce_number("   ", Decimal::ONE), Ok(Decimal::ONE));
        assert_eq!(coerce_number("two", Decimal::ONE), Ok(Decimal::ONE));
        assert_eq!(coerce_number("1,000", Decimal::ZERO), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_coerce_number_keeps_huge_values_apart_from_fallback() {
        let price = format!("${}", "9".repeat(30));
        assert_eq!(coerce_number(&price, Decimal::ZERO), Err(NumberError::OutOfRange));
    }

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value(&json!(15), Decimal::ZERO), Ok(dec("15")));
        assert_eq!(coerce_value(&json!(0.15), Decimal::ZERO), Ok(dec("0.15")));
        assert_eq!(coerce_value(&json!("$99.90"), Decimal::ZERO), Ok(dec("99.9")));
        assert_eq!(coerce_value(&json!(null), Decimal::ONE), Ok(Decimal::ONE));
        assert_eq!(coerce_value(&json!(true), Decimal::ONE), Ok(Decimal::ONE));
        assert_eq!(coerce_value(&json!([1]), Decimal::ONE), Ok(Decimal::ONE));
    }

    #[test]
    fn test_coerce_value_out_of_range() {
        assert_eq!(coerce_value(&json!(1e30), Decimal::ZERO), Err(NumberError::OutOfRange));
        assert_eq!(coerce_value(&json!(-1e300), Decimal::ZERO), Err(NumberError::OutOfRange));
        assert_eq!(coerce_value(&json!(u64::MAX), Decimal::ZERO), Ok(Decimal::from(u64::MAX)));
    }

    proptest! {
        #[test]
        fn coerce_number_never_panics(raw in ".*") {
            let _ = coerce_number(&raw, Decimal::ONE);
        }

        #[test]
        fn integers_round_trip(n in -1_000_000_000i64..1_000_000_000i64) {
            prop_assert_eq!(coerce_number(&n.to_string(), Decimal::ZERO), Ok(Decimal::from(n)));
        }
    }
}
