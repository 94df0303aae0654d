//! Mailgun HTTP API backend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::error::DeliveryError;
use crate::{Mailer, OutgoingMail, Result};

/// Environment variable holding the sending domain.
pub const ENV_DOMAIN: &str = "MAILGUN_DOMAIN";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "MAILGUN_API_KEY";
/// Environment variable holding the `From` address of replies.
pub const ENV_FROM: &str = "REPLY_FROM";

/// Connection settings for Mailgun.
#[derive(Clone)]
pub struct MailgunConfig {
    pub domain: String,
    pub api_key: String,
    pub from: String,
    pub api_base: String,
}

impl std::fmt::Debug for MailgunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailgunConfig")
            .field("domain", &self.domain)
            .field("api_key", &"<redacted>")
            .field("from", &self.from)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl MailgunConfig {
    pub const DEFAULT_API_BASE: &'static str = "https://api.mailgun.net/v3";

    pub fn new(domain: impl Into<String>, api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            api_key: api_key.into(),
            from: from.into(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
        }
    }

    /// Read `MAILGUN_DOMAIN`, `MAILGUN_API_KEY` and `REPLY_FROM`.
    ///
    /// All missing variables are reported in one error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let domain = read(ENV_DOMAIN);
        let api_key = read(ENV_API_KEY);
        let from = read(ENV_FROM);

        match (domain, api_key, from) {
            (Some(domain), Some(api_key), Some(from)) => Ok(Self::new(domain, api_key, from)),
            (domain, api_key, from) => {
                let missing: Vec<&str> = [
                    (ENV_DOMAIN, domain.is_none()),
                    (ENV_API_KEY, api_key.is_none()),
                    (ENV_FROM, from.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(DeliveryError::Config(format!(
                    "missing environment variables: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Use a different API base (e.g. the EU region).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Endpoint that accepts new messages.
    pub fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.api_base.trim_end_matches('/'), self.domain)
    }
}

/// Sends mail through Mailgun's `messages` endpoint.
pub struct MailgunMailer {
    client: reqwest::Client,
    config: MailgunConfig,
}

impl MailgunMailer {
    pub fn new(config: MailgunConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn build_form(&self, mail: &OutgoingMail) -> Result<Form> {
        let attachment = Part::bytes(mail.attachment.content.clone())
            .file_name(mail.attachment.filename.clone())
            .mime_str(&mail.attachment.content_type)?;

        Ok(Form::new()
            .text("from", self.config.from.clone())
            .text("to", mail.to.clone())
            .text("subject", mail.subject.clone())
            .text("text", mail.text.clone())
            .part("attachment", attachment))
    }
}

#[async_trait]
impl Mailer for MailgunMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let url = self.config.messages_url();
        debug!(
            "Posting message to {} with {} byte attachment",
            url,
            mail.attachment.content.len()
        );

        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(&self.config.api_key))
            .multipart(self.build_form(mail)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Mailed {} to {}", mail.attachment.filename, mail.to);
        Ok(())
    }
}
