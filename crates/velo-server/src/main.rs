//! # velo-server
//!
//! HTTP server for the velo bike rental system.
//!
//! This binary provides:
//! - REST API for the bike catalog, rental lifecycle, and billing
//! - OpenAPI documentation at /api/openapi.json
//! - Structured logging to file and stdout
//!
//! ## Running
//!
//! ```bash
//! # Development
//! cargo run --package velo-server
//!
//! # Production
//! VELO_ENV=production ./velo-server
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use velo_core::VeloConfig;

use velo_server::{api, logging, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let is_production = std::env::var("VELO_ENV").is_ok_and(|v| v == "production");
    logging::init(is_production)?;

    info!("Starting velo-server");

    let config_path = std::env::var("VELO_CONFIG")
        .map_or_else(|_| VeloConfig::default_path(), std::path::PathBuf::from);
    let config = VeloConfig::load_or_default(&config_path)?;
    info!(
        bikes = config.bikes.len(),
        renters = config.renters.len(),
        "Configuration loaded"
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState::new(config).into_shared();
    let app = api::create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
