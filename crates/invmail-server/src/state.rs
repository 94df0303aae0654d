//! Application state for the invmail HTTP service.

use std::sync::Arc;

use invmail_core::models::MailConfig;
use invmail_core::{InvmailConfig, InvoiceInput, InvoiceNormalizer, InvoiceRenderer, RenderError};
use invmail_delivery::{ChromiumRenderer, DocumentRenderer, MailgunConfig, MailgunMailer, Mailer};
use tracing::{info, warn};

pub struct AppState {
    pub normalizer: InvoiceNormalizer,
    pub renderer: InvoiceRenderer,
    pub pdf: Arc<dyn DocumentRenderer>,
    /// `None` when mail credentials are absent; the inbound route answers 503.
    pub mailer: Option<Arc<dyn Mailer>>,
    pub mail: MailConfig,
}

impl AppState {
    pub fn new(config: &InvmailConfig, pdf: Arc<dyn DocumentRenderer>) -> Result<Self, RenderError> {
        Ok(Self {
            normalizer: InvoiceNormalizer::new().with_defaults(config.invoice.clone()),
            renderer: InvoiceRenderer::new()?,
            pdf,
            mailer: None,
            mail: config.mail.clone(),
        })
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Wire up Chromium and, when its variables are set, Mailgun.
    pub fn from_config(config: &InvmailConfig) -> Result<Self, RenderError> {
        let pdf = ChromiumRenderer::from_config(&config.pdf);
        info!("PDF output via {}", pdf.binary().display());

        let state = Self::new(config, Arc::new(pdf))?;

        match MailgunConfig::from_env() {
            Ok(mailgun) => {
                let mailgun = mailgun.with_api_base(config.mail.api_base.clone());
                info!("Mail delivery via Mailgun domain {}", mailgun.domain);
                Ok(state.with_mailer(Arc::new(MailgunMailer::new(mailgun))))
            }
            Err(e) => {
                warn!("Inbound mail disabled: {}", e);
                Ok(state)
            }
        }
    }

    pub fn render_html(&self, input: &InvoiceInput) -> Result<String, RenderError> {
        self.renderer.render_input(&self.normalizer, input)
    }
}
