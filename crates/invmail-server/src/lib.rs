//! invmail HTTP service.
//!
//! Routes:
//! - `GET /health` liveness probe
//! - `GET /preview` sample invoice as HTML
//! - `POST /generate[?format=html]` invoice from JSON, form or instruction text
//! - `POST /email/inbound` mail webhook that replies with the invoice attached

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod body;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Build the application router. Unmatched paths and methods answer 404.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health).fallback(handlers::not_found))
        .route("/preview", get(handlers::preview).fallback(handlers::not_found))
        .route("/generate", post(handlers::generate).fallback(handlers::not_found))
        .route(
            "/email/inbound",
            post(handlers::email_inbound).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
