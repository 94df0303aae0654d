//! Request body decoding.
//!
//! Bodies are interpreted by content type: JSON, URL-encoded forms, and
//! anything else as plain text. An empty body is an empty object whatever
//! the content type says.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use invmail_core::{parse_instructions, InvoiceInput};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A decoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum InvoiceBody {
    /// A JSON document, or the fields of a form.
    Fields(Value),
    /// Raw text of any other content type.
    Text(String),
}

impl InvoiceBody {
    fn empty() -> Self {
        InvoiceBody::Fields(Value::Object(Map::new()))
    }

    /// Decode JSON or plain text. Forms go through axum's `Form` extractor.
    pub fn decode(content_type: &str, bytes: &[u8]) -> Result<Self, ApiError> {
        if bytes.is_empty() {
            return Ok(Self::empty());
        }

        if is_json(content_type) {
            let value = serde_json::from_slice(bytes)
                .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {}", e)))?;
            return Ok(InvoiceBody::Fields(value));
        }

        Ok(InvoiceBody::Text(String::from_utf8_lossy(bytes).into_owned()))
    }

    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let fields: Map<String, Value> = pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        InvoiceBody::Fields(Value::Object(fields))
    }

    /// A non-empty string field. Plain text bodies expose their content as `text`.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match self {
            InvoiceBody::Fields(value) => value.get(name)?.as_str()?,
            InvoiceBody::Text(text) if name == "text" => text.as_str(),
            InvoiceBody::Text(_) => return None,
        };
        (!value.is_empty()).then_some(value)
    }

    /// Turn the body into normalizer input. Text bodies are instruction text.
    pub fn into_invoice_input(self) -> Result<InvoiceInput, ApiError> {
        match self {
            InvoiceBody::Fields(value) => Ok(InvoiceInput::from_value(value)?),
            InvoiceBody::Text(text) => Ok(parse_instructions(&text).into()),
        }
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    essence == "application/json" || essence.ends_with("+json")
}

fn is_form(content_type: &str) -> bool {
    content_type.contains("application/x-www-form-urlencoded")
}

#[async_trait]
impl<S> FromRequest<S> for InvoiceBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if is_form(&content_type) {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            return Ok(Self::from_pairs(pairs));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Self::decode(&content_type, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_empty_object() {
        assert_eq!(InvoiceBody::decode("application/json", b"").unwrap(), InvoiceBody::empty());
        assert_eq!(InvoiceBody::decode("text/plain", b"").unwrap(), InvoiceBody::empty());
        assert_eq!(InvoiceBody::decode("", b"").unwrap(), InvoiceBody::empty());
    }

    #[test]
    fn test_json_body() {
        let body = InvoiceBody::decode("application/json; charset=utf-8", br#"{"clientName":"Acme"}"#).unwrap();
        assert_eq!(body, InvoiceBody::Fields(json!({ "clientName": "Acme" })));
        assert_eq!(body.field("clientName"), Some("Acme"));
    }

    #[test]
    fn test_malformed_json() {
        let err = InvoiceBody::decode("application/json", b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_text_body() {
        let body = InvoiceBody::decode("text/plain", b"client_name: Acme").unwrap();
        assert_eq!(body.field("text"), Some("client_name: Acme"));
        assert_eq!(body.field("from"), None);
    }

    #[test]
    fn test_form_pairs_last_wins() {
        let body = InvoiceBody::from_pairs(vec![
            ("from".to_string(), "a@example.com".to_string()),
            ("from".to_string(), "b@example.com".to_string()),
            ("subject".to_string(), String::new()),
        ]);
        assert_eq!(body.field("from"), Some("b@example.com"));
        assert_eq!(body.field("subject"), None);
    }

    #[test]
    fn test_text_becomes_instructions() {
        let body = InvoiceBody::Text("client_name: Acme\nitem: Work | 2 | 50".to_string());
        let input = body.into_invoice_input().unwrap();
        assert_eq!(input.client_name.as_deref(), Some("Acme"));
        assert_eq!(input.items.len(), 1);
    }

    #[test]
    fn test_non_object_json_is_structure_error() {
        let err = InvoiceBody::Fields(json!([1, 2])).into_invoice_input().unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
