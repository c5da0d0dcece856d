//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;

use hotspot_admin::config::AppConfig;
use hotspot_admin::http::{AppState, HttpServer};
use hotspot_admin::lifecycle::Shutdown;
use hotspot_admin::payments::{
    PaymentError, PaymentRecord, PaymentResult, PaymentSource, PaymentStatus,
};
use hotspot_admin::plans::PlanCatalog;
use hotspot_admin::sessions::SessionService;
use hotspot_admin::store::MemoryStore;
use hotspot_admin::users::UserProfile;

pub const ADMIN_KEY: &str = "test-key";

/// Config with the admin API on and the metrics exporter off.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.observability.metrics_enabled = false;
    config.admin.enabled = true;
    config.admin.api_key = ADMIN_KEY.to_string();
    config
}

/// Running server plus handles to poke at its state.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn store(&self) -> &MemoryStore {
        &self.state.store
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Serve a fresh in-memory store on an ephemeral port.
pub async fn spawn_server(config: AppConfig) -> TestServer {
    let store = MemoryStore::new(None);
    let sessions = SessionService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(config.plan_catalog().unwrap()),
        config.timeouts.user_lookup(),
    );
    spawn_with(config, store, sessions).await
}

/// Serve with a payment source other than the store.
pub async fn spawn_with_source(config: AppConfig, source: Arc<dyn PaymentSource>) -> TestServer {
    let store = MemoryStore::new(None);
    let sessions = SessionService::new(
        source,
        Arc::new(store.clone()),
        Arc::new(PlanCatalog::default()),
        Duration::from_millis(500),
    );
    spawn_with(config, store, sessions).await
}

async fn spawn_with(config: AppConfig, store: MemoryStore, sessions: SessionService) -> TestServer {
    let shutdown = Shutdown::new();
    let state = AppState::new(Arc::new(config), store, sessions, shutdown.clone());

    tokio::spawn(state.relay().run(shutdown.subscribe()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(state.clone());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        state,
        shutdown,
    }
}

/// Payment source that is always down.
pub struct FailingSource;

#[async_trait]
impl PaymentSource for FailingSource {
    async fn completed_payments(&self) -> PaymentResult<Vec<PaymentRecord>> {
        Err(PaymentError::Unavailable("connection refused".to_string()))
    }
}

pub fn payment(id: &str, user_id: &str, amount: u32, created_at: DateTime<Utc>) -> PaymentRecord {
    PaymentRecord {
        id: id.to_string(),
        user_id: user_id.to_string(),
        amount,
        created_at,
        status: PaymentStatus::Completed,
    }
}

pub fn user(id: &str, username: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
    }
}
