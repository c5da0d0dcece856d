//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the plan catalog and store from configuration
//! - Start background tasks (metrics, dashboard relay, signal watcher)
//! - Bind the listener and begin accepting traffic
//! - Persist the store once the server has drained
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::signals::wait_for_signal;
use crate::lifecycle::Shutdown;
use crate::net::tls::load_tls_config;
use crate::observability::metrics;
use crate::plans::CatalogError;
use crate::sessions::SessionService;
use crate::store::{MemoryStore, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid plan catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("failed to load store: {0}")]
    Store(#[from] StoreError),

    #[error("invalid address '{value}': {source}")]
    Address {
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Assemble application state from a validated configuration.
pub fn build_state(config: AppConfig, shutdown: Shutdown) -> Result<AppState, StartupError> {
    let catalog = Arc::new(config.plan_catalog()?);
    tracing::info!(plans = catalog.len(), "Plan catalog ready");

    let store = match &config.store.snapshot_path {
        Some(path) => MemoryStore::load_from_file(path)?,
        None => MemoryStore::new(None),
    };

    let sessions = SessionService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        catalog,
        config.timeouts.user_lookup(),
    );

    Ok(AppState::new(Arc::new(config), store, sessions, shutdown))
}

/// Run the service until a termination signal arrives.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr = parse_addr(&config.observability.metrics_address)?;
        metrics::init_metrics(addr);
    }

    let shutdown = Shutdown::new();
    let state = build_state(config, shutdown.clone())?;
    let config = state.config.clone();
    let store = state.store.clone();

    tokio::spawn(state.relay().run(shutdown.subscribe()));

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(state);
    let server_shutdown = shutdown.subscribe();

    match &config.listener.tls {
        Some(tls) => {
            let addr = parse_addr(&config.listener.bind_address)?;
            let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
            server.run_tls(addr, rustls, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            server.run(listener, server_shutdown).await?;
        }
    }

    // Server may also stop on its own; make sure background tasks follow.
    shutdown.trigger();

    if let Err(e) = store.save_to_file() {
        tracing::error!(error = %e, "Failed to save store snapshot");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn parse_addr(value: &str) -> Result<SocketAddr, StartupError> {
    value.parse().map_err(|source| StartupError::Address {
        value: value.to_string(),
        source,
    })
}
