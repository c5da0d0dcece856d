//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::plans::catalog::DEFAULT_PLANS;
use crate::plans::{CatalogError, Plan, PlanCatalog, PlanId};

/// Root configuration for the admin service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub admin: AdminConfig,

    pub store: StoreConfig,

    pub dashboard: DashboardConfig,

    pub security: SecurityConfig,

    /// Plan catalog. Replaces the built-in table entirely when present.
    pub plans: PlansConfig,
}

impl AppConfig {
    /// Build the plan catalog described by this configuration.
    pub fn plan_catalog(&self) -> Result<PlanCatalog, CatalogError> {
        let plans = self
            .plans
            .0
            .iter()
            .map(PlanConfig::to_plan)
            .collect::<Result<Vec<Plan>, CatalogError>>()?;
        PlanCatalog::new(plans)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3001").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,

    /// Deadline for a single user lookup in milliseconds.
    pub user_lookup_ms: u64,
}

impl TimeoutConfig {
    pub fn user_lookup(&self) -> Duration {
        Duration::from_millis(self.user_lookup_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            user_lookup_ms: 2_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the /admin routes.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON snapshot loaded at startup and written at shutdown.
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of payments listed in the recent feed.
    pub recent_payments_limit: usize,

    /// Number of months in the earnings series.
    pub earnings_months: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_payments_limit: 5,
            earnings_months: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Add hardening response headers.
    pub enable_headers: bool,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Origin allowed to call the API from a browser (the dashboard front-end).
    pub cors_origin: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// One plan entry (`[[plans]]`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlanConfig {
    pub id: PlanId,
    pub price: u32,
    pub duration_secs: u64,
}

impl PlanConfig {
    pub fn to_plan(&self) -> Result<Plan, CatalogError> {
        Plan::from_secs(self.id, self.price, self.duration_secs)
    }
}

/// Plan list, defaulting to the built-in table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PlansConfig(pub Vec<PlanConfig>);

impl Default for PlansConfig {
    fn default() -> Self {
        Self(
            DEFAULT_PLANS
                .iter()
                .map(|&(id, price, secs)| PlanConfig {
                    id,
                    price,
                    duration_secs: secs.unsigned_abs(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3001");
        assert_eq!(config.timeouts.user_lookup(), Duration::from_millis(2_000));
        assert_eq!(config.dashboard.recent_payments_limit, 5);
        assert!(!config.admin.enabled);
        assert_eq!(config.plans.0.len(), 8);

        let catalog = config.plan_catalog().unwrap();
        assert_eq!(catalog.plans(), PlanCatalog::default().plans());
    }

    #[test]
    fn test_plan_override() {
        let config: AppConfig = toml::from_str(
            r#"
            [admin]
            enabled = true
            api_key = "secret"

            [[plans]]
            id = "half_hour"
            price = 7
            duration_secs = 1800

            [[plans]]
            id = "one_day"
            price = 80
            duration_secs = 86400
            "#,
        )
        .unwrap();

        let catalog = config.plan_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.plan_for_amount(5).is_none());
        assert_eq!(catalog.plan_for_amount(80).unwrap().id, PlanId::OneDay);
        assert_eq!(config.admin.api_key, "secret");
    }
}
