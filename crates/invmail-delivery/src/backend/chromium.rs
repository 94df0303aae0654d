//! Headless Chromium backend.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use invmail_core::models::PdfConfig;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::DeliveryError;
use crate::{DocumentRenderer, Result};

const PDF_MAGIC: &[u8] = b"%PDF";

/// Prints HTML to PDF by shelling out to a headless Chromium.
///
/// Page size and margins come from the document's `@page` rules.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    binary: PathBuf,
    extra_args: Vec<OsString>,
    timeout: Duration,
}

impl ChromiumRenderer {
    /// Use the given Chromium (or Chrome) executable.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            extra_args: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Build from the `pdf` configuration section.
    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new(&config.chromium_path).with_timeout(Duration::from_secs(config.timeout_secs))
    }

    /// Abandon renders that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pass an additional argument ahead of the standard flags.
    pub fn with_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command_args(&self, html_path: &Path, pdf_path: &Path) -> Vec<OsString> {
        let mut print_to = OsString::from("--print-to-pdf=");
        print_to.push(pdf_path);

        let mut args = self.extra_args.clone();
        args.extend([
            OsString::from("--headless"),
            OsString::from("--no-sandbox"),
            OsString::from("--disable-gpu"),
            print_to,
            OsString::from("--no-pdf-header-footer"),
            html_path.as_os_str().to_owned(),
        ]);
        args
    }
}

#[async_trait]
impl DocumentRenderer for ChromiumRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>> {
        let workdir = tempfile::tempdir()?;
        let html_path = workdir.path().join("invoice.html");
        let pdf_path = workdir.path().join("invoice.pdf");
        tokio::fs::write(&html_path, html).await?;

        debug!(
            "Printing {} bytes of HTML with {}",
            html.len(),
            self.binary.display()
        );

        let child = Command::new(&self.binary)
            .args(self.command_args(&html_path, &pdf_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DeliveryError::Process(format!("failed to start {}: {}", self.binary.display(), e))
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                warn!("Chromium did not finish within {:?}", self.timeout);
                DeliveryError::Timeout(self.timeout)
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeliveryError::Process(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        let pdf = match tokio::fs::read(&pdf_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DeliveryError::Process("no PDF was written".to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        if !pdf.starts_with(PDF_MAGIC) {
            return Err(DeliveryError::Process("output is not a PDF document".to_string()));
        }

        debug!("Produced {} byte PDF", pdf.len());
        Ok(pdf)
    }
}
