//! Configuration structures for the invoicing pipeline.
//!
//! Secrets (mail API keys) never live here; they are read from the
//! environment at the delivery boundary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{InvmailError, Result};

/// Main configuration for invmail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvmailConfig {
    /// Fallback values for invoice fields.
    pub invoice: InvoiceDefaults,

    /// HTTP service configuration.
    pub server: ServerConfig,

    /// PDF production configuration.
    pub pdf: PdfConfig,

    /// Mail delivery configuration.
    pub mail: MailConfig,
}

/// Values used when an invoice leaves a field unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceDefaults {
    pub company_name: String,
    pub company_email: String,
    pub client_name: String,
    pub client_email: String,
    pub notes: String,

    /// Prefix for generated invoice numbers (followed by a millisecond timestamp).
    pub invoice_number_prefix: String,

    /// Days between the issue date and the generated due date.
    pub payment_terms_days: u32,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        Self {
            company_name: "Sasinelwa Studio".to_string(),
            company_email: "billing@sasinelwa.com".to_string(),
            client_name: "Client Name".to_string(),
            client_email: "client@example.com".to_string(),
            notes: "Thank you for your business.".to_string(),
            invoice_number_prefix: "INV-".to_string(),
            payment_terms_days: 14,
        }
    }
}

/// HTTP service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to listen on (the `PORT` variable overrides it).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// PDF production configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Headless Chromium executable.
    pub chromium_path: PathBuf,

    /// Seconds before a render is abandoned.
    pub timeout_secs: u64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            chromium_path: PathBuf::from("chromium"),
            timeout_secs: 30,
        }
    }
}

/// Mail delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Mailgun API base URL (EU accounts use `https://api.eu.mailgun.net/v3`).
    pub api_base: String,

    /// Plain-text body sent alongside the PDF.
    pub reply_text: String,

    /// Prefix added to the subject of replies.
    pub subject_prefix: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.mailgun.net/v3".to_string(),
            reply_text: "Your invoice document has been processed and is attached as PDF."
                .to_string(),
            subject_prefix: "Processed: ".to_string(),
        }
    }
}

impl InvmailConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<()> {
        if self.pdf.timeout_secs == 0 {
            return Err(InvmailError::Config("pdf.timeout_secs must be positive".to_string()));
        }
        if self.mail.api_base.trim().is_empty() {
            return Err(InvmailError::Config("mail.api_base must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: InvmailConfig =
            serde_json::from_str(r#"{ "invoice": { "company_name": "Acme" }, "server": { "port": 8080 } }"#)
                .unwrap();

        assert_eq!(config.invoice.company_name, "Acme");
        assert_eq!(config.invoice.payment_terms_days, 14);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.pdf.timeout_secs, 30);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvmailConfig::default();
        config.invoice.notes = "Net 30".to_string();
        config.save(&path).unwrap();

        let loaded = InvmailConfig::from_file(&path).unwrap();
        assert_eq!(loaded.invoice.notes, "Net 30");
    }

    #[test]
    fn test_invalid_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = InvmailConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, InvmailError::Json(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = InvmailConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, InvmailError::Io(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "pdf": { "timeout_secs": 0 } }"#).unwrap();

        let err = InvmailConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, InvmailError::Config(_)));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = InvmailConfig::load_or_default(None).unwrap();
        assert_eq!(config.invoice, InvoiceDefaults::default());
    }
}
