//! Delivery layer for invmail.
//!
//! Two seams sit between a rendered invoice and the outside world:
//! - [`DocumentRenderer`] turns invoice HTML into PDF bytes
//!   (headless Chromium via `ChromiumRenderer`)
//! - [`Mailer`] sends a message with one attachment
//!   (Mailgun's HTTP API via `MailgunMailer`)
//!
//! Both are object-safe async traits so the HTTP service can hold them as
//! `Arc<dyn ...>` and tests can swap in fakes.

mod backend;
mod error;
mod mail;

pub use backend::{DocumentRenderer, Mailer};
pub use error::DeliveryError;
pub use mail::{Attachment, OutgoingMail, PDF_CONTENT_TYPE};

#[cfg(feature = "chromium")]
pub use backend::chromium::ChromiumRenderer;

#[cfg(feature = "mailgun")]
pub use backend::mailgun::{MailgunConfig, MailgunMailer};

/// Result type for delivery operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;
