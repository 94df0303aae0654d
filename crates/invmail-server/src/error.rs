//! Error types for the invmail HTTP service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use invmail_core::{NormalizeError, RenderError};
use invmail_delivery::DeliveryError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Mail delivery is not configured")]
    MailUnavailable,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        ApiError::Render(RenderError::Normalize(err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MailUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Render(RenderError::Normalize(NormalizeError::Structure(_))) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Render(_) | ApiError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
