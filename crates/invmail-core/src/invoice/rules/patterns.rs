//! Common regex patterns for instruction text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Any line ending: CRLF, LF or a lone CR
    pub static ref LINE_BREAK: Regex = Regex::new(r"\r\n|\n|\r").unwrap();

    // Characters dropped before a numeric parse
    pub static ref NUMERIC_NOISE: Regex = Regex::new(r"[\s$%]+").unwrap();

    // Decimal literal with optional sign, fraction and exponent ("12", "-.5", "3.", "1e3")
    pub static ref DECIMAL_LITERAL: Regex = Regex::new(
        r"^([+-]?)(\d*)(?:\.(\d*))?(?:[eE]([+-]?\d+))?$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_break_styles() {
        let parts: Vec<&str> = LINE_BREAK.split("a\r\nb\nc\rd").collect();
        assert_eq!(parts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_numeric_noise() {
        assert_eq!(NUMERIC_NOISE.replace_all(" $ 1 200 % ", ""), "1200");
    }

    #[test]
    fn test_decimal_literal() {
        assert!(DECIMAL_LITERAL.is_match("12.50"));
        assert!(DECIMAL_LITERAL.is_match("-.5"));
        assert!(DECIMAL_LITERAL.is_match("1e3"));
        assert!(!DECIMAL_LITERAL.is_match("1,200"));
        assert!(!DECIMAL_LITERAL.is_match("abc"));
    }
}
