//! Display formatting for amounts and quantities.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to cents the way en-US currency formatting does.
fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Group the integer digits of a non-negative number in threes.
fn group_thousands(integer_part: &str) -> String {
    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + chars.len() / 3);

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    grouped
}

/// Format an amount as US dollars (`$1,234.56`, `-$20.00`).
pub fn format_currency(amount: Decimal) -> String {
    let rounded = to_cents(amount);
    if rounded.is_zero() {
        return "$0.00".to_string();
    }

    let digits = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = digits.split_once('.').unwrap_or((&digits, "00"));
    let sign = if rounded.is_sign_negative() { "-" } else { "" };

    format!("{}${}.{}", sign, group_thousands(integer_part), decimal_part)
}

/// Format a quantity as a plain number with exactly two decimals.
pub fn format_quantity(quantity: Decimal) -> String {
    let rounded = to_cents(quantity);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}
