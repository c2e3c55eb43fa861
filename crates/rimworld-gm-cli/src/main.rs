//! RimWorld GM MCP Server
//!
//! Serves the three RimWorld tools over MCP stdio and forwards each call to
//! the game-side HTTP API.
//!
//! Usage:
//!   rimworld-gm-server [BASE_URL]
//!
//! `BASE_URL` overrides `RIMWORLD_GM_API_URL`, which overrides
//! `http://localhost:18800`.

use anyhow::Result;
use rimworld_gm_bridge::{HttpRemoteClient, RemoteClient, RemoteConfig};
use rimworld_gm_server::GmServer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = RemoteConfig::from_env();
    if let Some(base_url) = std::env::args().nth(1) {
        config.base_url = base_url;
    }
    info!(
        "RimWorld GM MCP server starting (API {}, timeout {:?})",
        config.base_url, config.timeout
    );

    let client = HttpRemoteClient::new(config)?;

    // The game may start after us; a failed probe is only reported
    match client.get("/health").await {
        Ok(response) if response.is_success() => info!("Game API reachable: {}", response.body),
        Ok(response) => warn!(
            "Game API answered {} to /health: {}",
            response.status, response.body
        ),
        Err(e) => warn!("Game API not reachable yet: {}", e),
    }

    GmServer::new(client).run_stdio().await?;
    Ok(())
}
