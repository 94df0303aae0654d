//! Instruction text parser.
//!
//! Turns the body of an instruction email into an [`InstructionRecord`].
//! Recognized lines look like `key: value` or
//! `item: description | quantity | unit price`; everything else is dropped
//! without failing the parse.

use std::fmt;

use tracing::{debug, info};

use rust_decimal::Decimal;

use crate::error::NumberError;
use crate::models::instruction::{Amount, InstructionKey, InstructionRecord, LineItem};

use super::rules::{
    coerce_number, parse_tax_rate, patterns::LINE_BREAK, DEFAULT_DESCRIPTION,
    ITEM_PRICE_FALLBACK, ITEM_QUANTITY_FALLBACK,
};

const ITEM_PREFIX: &str = "item:";

/// Result of parsing instruction text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
    /// Parsed instructions.
    pub record: InstructionRecord,
    /// Non-blank lines that did not contribute to the record.
    pub ignored: Vec<IgnoredLine>,
}

/// A line the parser skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredLine {
    /// 1-based line number in the source text.
    pub line_number: usize,
    /// Trimmed line content.
    pub text: String,
    pub reason: IgnoreReason,
}

/// Why a line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No `:` on the line.
    MissingSeparator,
    /// Nothing before the `:`.
    EmptyKey,
    /// A key outside the recognized set.
    UnknownKey(String),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::MissingSeparator => write!(f, "no ':' separator"),
            IgnoreReason::EmptyKey => write!(f, "empty key"),
            IgnoreReason::UnknownKey(key) => write!(f, "unknown key '{}'", key),
        }
    }
}

/// Parser for instruction text.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstructionParser;

impl InstructionParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse instruction text. Never fails; unusable lines end up in
    /// [`ParseResult::ignored`].
    pub fn parse(&self, text: &str) -> ParseResult {
        info!("Parsing instructions from {} characters of text", text.len());

        let mut result = ParseResult::default();

        for (index, raw_line) in LINE_BREAK.split(text).enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(payload) = strip_item_prefix(line) {
                result.record.items.push(parse_item(payload));
                continue;
            }

            if let Err(reason) = apply_field(&mut result.record, line) {
                debug!("Ignoring line {}: {} ({})", index + 1, line, reason);
                result.ignored.push(IgnoredLine {
                    line_number: index + 1,
                    text: line.to_string(),
                    reason,
                });
            }
        }

        debug!(
            "Parsed {} items, ignored {} lines",
            result.record.items.len(),
            result.ignored.len()
        );

        result
    }
}

/// Parse instruction text into a record, discarding diagnostics.
pub fn parse_instructions(text: &str) -> InstructionRecord {
    InstructionParser::new().parse(text).record
}

/// Return the remainder of an `item:` line (prefix matched case-insensitively).
fn strip_item_prefix(line: &str) -> Option<&str> {
    let prefix = line.get(..ITEM_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(ITEM_PREFIX) {
        Some(line[ITEM_PREFIX.len()..].trim())
    } else {
        None
    }
}

/// Parse `description | quantity | unit price`. Segments past the third
/// are ignored.
fn parse_item(payload: &str) -> LineItem {
    let mut segments = payload.split('|').map(str::trim);

    let description = segments
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION);
    let quantity = segments.next().map_or(Amount::from(ITEM_QUANTITY_FALLBACK), |s| {
        amount(s, coerce_number(s, ITEM_QUANTITY_FALLBACK))
    });
    let unit_price = segments.next().map_or(Amount::from(ITEM_PRICE_FALLBACK), |s| {
        amount(s, coerce_number(s, ITEM_PRICE_FALLBACK))
    });

    LineItem::new(description, quantity, unit_price)
}

/// Keep the source text of a number too large to hold.
fn amount(raw: &str, parsed: Result<Decimal, NumberError>) -> Amount {
    match parsed {
        Ok(value) => Amount::Value(value),
        Err(err) => {
            debug!("Keeping amount '{}' unparsed: {}", raw, err);
            Amount::OutOfRange(raw.to_string())
        }
    }
}

/// Apply a `key: value` line. Later lines overwrite earlier ones.
fn apply_field(record: &mut InstructionRecord, line: &str) -> Result<(), IgnoreReason> {
    let (key, value) = line.split_once(':').ok_or(IgnoreReason::MissingSeparator)?;

    let key = key.trim();
    if key.is_empty() {
        return Err(IgnoreReason::EmptyKey);
    }

    let value = value.trim();
    match InstructionKey::from_str(key) {
        Some(InstructionKey::TaxRate) => record.tax_rate = Some(amount(value, parse_tax_rate(value))),
        Some(InstructionKey::Text(field)) => record.set_text(field, value.to_string()),
        None => return Err(IgnoreReason::UnknownKey(key.to_lowercase())),
    }

    Ok(())
}
