//! Data models: parsed instructions, normalizer input, display output and configuration.

pub mod config;
pub mod display;
pub mod input;
pub mod instruction;

pub use config::{InvmailConfig, InvoiceDefaults, MailConfig, PdfConfig, ServerConfig};
pub use display::{DisplayLineItem, InvoiceDisplayModel};
pub use input::{InputItem, InvoiceInput};
pub use instruction::{Amount, InstructionKey, InstructionRecord, LineItem, TextField};
