//! Service entry point: environment-driven configuration, tracing
//! subscriber, and the listener loop.
//!
//! Environment:
//! - `PINATA_JWT` — bearer token for the pinning service (required)
//! - `PINATA_API_URL` — pinning API base (default `https://api.pinata.cloud`)
//! - `IPFS_GATEWAY` — resolution gateway (default `https://gateway.pinata.cloud`)
//! - `BIND_ADDR` — listen address (default `0.0.0.0:8080`)

use anyhow::Context;
use metacert_api::state::AppState;
use metacert_pin::{PinataClient, PinataConfig, Publisher};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let jwt = std::env::var("PINATA_JWT").context("PINATA_JWT must be set")?;
    let api_url =
        std::env::var("PINATA_API_URL").unwrap_or_else(|_| "https://api.pinata.cloud".to_string());
    let gateway = std::env::var("IPFS_GATEWAY")
        .unwrap_or_else(|_| "https://gateway.pinata.cloud".to_string());
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let client = PinataClient::new(PinataConfig::new(api_url, jwt).with_gateway(gateway))
        .context("building pinning client")?;
    let state = AppState::new(Publisher::new(client));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "upload service listening");

    axum::serve(listener, metacert_api::app(state))
        .await
        .context("serving")?;
    Ok(())
}
