//! invmail HTTP server.
//!
//! Configuration comes from an optional JSON file (`INVMAIL_CONFIG`), with
//! `PORT` overriding the listen port. Mail credentials are read from
//! `MAILGUN_DOMAIN`, `MAILGUN_API_KEY` and `REPLY_FROM`; a `.env` file is
//! loaded first when present.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use invmail_core::InvmailConfig;
use invmail_server::{router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("invmail_server=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config_path = std::env::var_os("INVMAIL_CONFIG").map(PathBuf::from);
    let config = InvmailConfig::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    let state = AppState::from_config(&config).context("Failed to initialize renderer")?;
    let app = router(Arc::new(state));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(config.server.port);

    let addr: SocketAddr = format!("{}:{}", config.server.host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, port))?;
    info!("Invoice processor listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
