//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
    Json,
};
use invmail_core::{InstructionParser, InvoiceInput};
use invmail_delivery::{Attachment, OutgoingMail, PDF_CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::body::InvoiceBody;
use crate::error::ApiError;
use crate::state::AppState;

type AppResult<T> = Result<T, ApiError>;

const DEFAULT_SUBJECT: &str = "Invoice Request";

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Sample invoice as HTML.
pub async fn preview(State(state): State<Arc<AppState>>) -> AppResult<Html<String>> {
    Ok(Html(state.render_html(&InvoiceInput::preview_sample())?))
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateParams {
    pub format: Option<String>,
}

/// Generate an invoice from JSON, form fields or instruction text.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateParams>,
    body: InvoiceBody,
) -> AppResult<Response> {
    let input = body.into_invoice_input()?;
    let html = state.render_html(&input)?;

    if params.format.as_deref() == Some("html") {
        return Ok(Html(html).into_response());
    }

    let pdf = state.pdf.render_pdf(&html).await?;
    info!("Generated {} byte invoice PDF", pdf.len());

    Ok((
        [
            (CONTENT_TYPE, PDF_CONTENT_TYPE),
            (CONTENT_DISPOSITION, "attachment; filename=\"invoice.pdf\""),
        ],
        pdf,
    )
        .into_response())
}

/// Mail webhook: turn the message text into an invoice and mail it back.
pub async fn email_inbound(
    State(state): State<Arc<AppState>>,
    body: InvoiceBody,
) -> AppResult<Json<Value>> {
    let sender = body.field("from").or_else(|| body.field("sender"));
    let text = body.field("text").or_else(|| body.field("body-plain"));
    let (Some(sender), Some(text)) = (sender, text) else {
        return Err(ApiError::BadRequest("Expected sender and text body".to_string()));
    };
    let subject = body.field("subject").unwrap_or(DEFAULT_SUBJECT);

    let mailer = state.mailer.clone().ok_or(ApiError::MailUnavailable)?;

    let parsed = InstructionParser::new().parse(text);
    info!(
        "Inbound request from {} with {} item(s), {} line(s) ignored",
        sender,
        parsed.record.items.len(),
        parsed.ignored.len()
    );

    let filename = format!(
        "{}.pdf",
        parsed
            .record
            .invoice_number
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("invoice")
    );
    let html = state.render_html(&InvoiceInput::from(parsed.record))?;
    let pdf = state.pdf.render_pdf(&html).await?;

    let mail = OutgoingMail {
        to: sender.to_string(),
        subject: format!("{}{}", state.mail.subject_prefix, subject),
        text: state.mail.reply_text.clone(),
        attachment: Attachment::pdf(filename, pdf),
    };
    mailer.send(&mail).await?;

    Ok(Json(json!({ "ok": true })))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
