//! Hotspot billing admin service.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                 HOTSPOT ADMIN                     │
//!                        │                                                   │
//!   Admin UI request     │  ┌─────────┐    ┌──────────┐    ┌─────────────┐   │
//!   ─────────────────────┼─▶│  http   │───▶│ sessions │───▶│   plans     │   │
//!                        │  │ server  │    │ service  │    │  catalog    │   │
//!                        │  └────┬────┘    └────┬─────┘    └─────────────┘   │
//!                        │       │              │                            │
//!                        │       │              ▼                            │
//!   Payment / user       │  ┌────┴────┐    ┌──────────┐    ┌─────────────┐   │
//!   ingestion ───────────┼─▶│  admin  │───▶│  store   │───▶│  dashboard  │───┼──▶ WebSocket
//!                        │  └─────────┘    └──────────┘    │   relay     │   │    clients
//!                        │                                 └─────────────┘   │
//!                        │  config · observability · lifecycle               │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use hotspot_admin::config::{load_config, AppConfig};
use hotspot_admin::lifecycle::startup;
use hotspot_admin::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "hotspot-admin")]
#[command(about = "Active-session and dashboard service for a WiFi hotspot", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "hotspot-admin starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        admin = config.admin.enabled,
        plans = config.plans.0.len(),
        "Configuration loaded"
    );

    startup::run(config).await?;
    Ok(())
}
