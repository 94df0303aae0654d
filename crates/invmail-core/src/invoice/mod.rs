//! Instruction parsing and invoice normalization.

mod normalizer;
mod parser;
pub mod rules;

pub use normalizer::{normalize, InvoiceNormalizer, InvoiceTotals};
pub use parser::{parse_instructions, IgnoreReason, IgnoredLine, InstructionParser, ParseResult};

use crate::error::NormalizeError;

/// Result type for normalization.
pub type Result<T> = std::result::Result<T, NormalizeError>;
