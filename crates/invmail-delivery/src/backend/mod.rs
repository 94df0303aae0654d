//! Delivery backend implementations.

#[cfg(feature = "chromium")]
pub mod chromium;

#[cfg(feature = "mailgun")]
pub mod mailgun;

use async_trait::async_trait;

use crate::{OutgoingMail, Result};

/// Turns a standalone HTML page into a PDF document.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Render `html` and return the PDF bytes.
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>>;
}

/// Sends a message with an attachment.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `mail`. Returns once the provider has accepted it.
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}
