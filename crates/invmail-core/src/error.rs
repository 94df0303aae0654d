//! Error types for the invmail-core library.

use thiserror::Error;

/// Main error type for the invmail library.
#[derive(Error, Debug)]
pub enum InvmailError {
    /// Invoice normalization error.
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// HTML rendering error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning invoice input into a display model.
///
/// Value-level problems (unparsable numbers, missing fields) never end up
/// here; they are coerced to fallbacks. Structural violations and amounts
/// outside the decimal range do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The input does not have the shape of an invoice.
    #[error("invalid invoice structure: {0}")]
    Structure(String),

    /// An amount, given or computed, left the representable decimal range.
    #[error("amount overflow in {field}")]
    Overflow { field: &'static str },
}

/// Why a numeric literal produced no value.
///
/// Lenient coercion turns `Invalid` into the caller's fallback; only
/// `OutOfRange` escapes it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    /// The text is not a number.
    #[error("not a number")]
    Invalid,

    /// The text is a number too large for a decimal amount.
    #[error("number is outside the supported decimal range")]
    OutOfRange,
}

/// Errors related to HTML rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The template failed to compile or render.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// The display model could not be computed.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Result type for the invmail library.
pub type Result<T> = std::result::Result<T, InvmailError>;
