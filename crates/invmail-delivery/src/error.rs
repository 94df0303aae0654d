//! Error types for the delivery layer.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while producing or sending a document.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Required configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The external renderer could not be started or failed.
    #[error("renderer failed: {0}")]
    Process(String),

    /// The external renderer did not finish in time.
    #[error("renderer timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level HTTP failure.
    #[cfg(feature = "mailgun")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The mail provider answered with a non-success status.
    #[error("mail provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// I/O error on temporary files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
