//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect ambiguous plan tables (shared ids or prices)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, PlanConfig};
use crate::plans::{CatalogError, Plan, PlanCatalog};

const MAX_EARNINGS_MONTHS: usize = 24;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("listener.tls: cert_path and key_path must both be set")]
    IncompleteTls,

    #[error("admin.api_key must not be empty when admin is enabled")]
    EmptyApiKey,

    #[error("dashboard.earnings_months must be between 1 and 24")]
    EarningsMonthsOutOfRange,

    #[error("plans: no plans defined")]
    NoPlans,

    #[error("plans: {0}")]
    Plan(#[from] CatalogError),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() || tls.key_path.trim().is_empty() {
            errors.push(ValidationError::IncompleteTls);
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.timeouts.user_lookup_ms == 0 {
        errors.push(ValidationError::Zero("timeouts.user_lookup_ms"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::EmptyApiKey);
    }

    if config.dashboard.recent_payments_limit == 0 {
        errors.push(ValidationError::Zero("dashboard.recent_payments_limit"));
    }
    if !(1..=MAX_EARNINGS_MONTHS).contains(&config.dashboard.earnings_months) {
        errors.push(ValidationError::EarningsMonthsOutOfRange);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    validate_plans(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Applies the same rules as `AppConfig::plan_catalog`, reporting all of them.
fn validate_plans(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let plans = &config.plans.0;
    if plans.is_empty() {
        errors.push(ValidationError::NoPlans);
        return;
    }

    let mut built: Vec<Plan> = Vec::with_capacity(plans.len());
    for plan in plans.iter().map(PlanConfig::to_plan) {
        match plan {
            Ok(plan) => built.push(plan),
            Err(e) => errors.push(e.into()),
        }
    }
    errors.extend(PlanCatalog::problems(&built).into_iter().map(ValidationError::from));
}
