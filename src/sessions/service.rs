//! Query entry point for active sessions.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::observability::metrics;
use crate::payments::{PaymentRecord, PaymentResult, PaymentSource};
use crate::plans::PlanCatalog;
use crate::sessions::calculator::{compute_active_sessions, ActiveSessionReport, SessionStats};
use crate::sessions::types::ActiveSession;
use crate::users::{DeadlineLookup, UserLookup};

/// Payment snapshot and the sessions derived from it at one instant.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub evaluated_at: DateTime<Utc>,
    pub payments: Vec<PaymentRecord>,
    pub report: ActiveSessionReport,
}

/// Reads payments, applies the catalog and resolves users.
///
/// Holds no per-call state; `last_stats` only mirrors the latest wall-clock
/// pass for the admin views.
#[derive(Clone)]
pub struct SessionService {
    payments: Arc<dyn PaymentSource>,
    users: Arc<dyn UserLookup>,
    catalog: Arc<PlanCatalog>,
    lookup_deadline: Duration,
    last_stats: Arc<Mutex<Option<SessionStats>>>,
}

impl SessionService {
    pub fn new(
        payments: Arc<dyn PaymentSource>,
        users: Arc<dyn UserLookup>,
        catalog: Arc<PlanCatalog>,
        lookup_deadline: Duration,
    ) -> Self {
        Self {
            payments,
            users,
            catalog,
            lookup_deadline,
            last_stats: Arc::new(Mutex::new(None)),
        }
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// User lookup bounded by the configured per-call deadline.
    pub fn lookup(&self) -> DeadlineLookup<Arc<dyn UserLookup>> {
        DeadlineLookup::new(self.users.clone(), self.lookup_deadline)
    }

    /// Active sessions at `now` (wall-clock time when `None`).
    pub async fn active_sessions(
        &self,
        now: Option<DateTime<Utc>>,
    ) -> PaymentResult<Vec<ActiveSession>> {
        Ok(self.evaluate(now).await?.report.sessions)
    }

    /// Read the payment feed and derive sessions from it.
    ///
    /// Fails only when the payment feed cannot be read; no partial result is
    /// produced in that case.
    pub async fn evaluate(&self, now: Option<DateTime<Utc>>) -> PaymentResult<Evaluation> {
        let evaluated_at = now.unwrap_or_else(Utc::now);

        let payments = self.payments.completed_payments().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to read payment source");
            e
        })?;

        let lookup = self.lookup();
        let report = compute_active_sessions(&payments, &self.catalog, &lookup, evaluated_at).await;

        tracing::debug!(
            scanned = report.stats.scanned,
            active = report.stats.active,
            expired = report.stats.expired,
            unknown_plan = report.stats.unknown_plan,
            "Active sessions evaluated"
        );

        // Passes at an explicit instant describe the past, not the ledger now.
        if now.is_none() {
            metrics::record_session_stats(&report.stats);
            if let Ok(mut last) = self.last_stats.lock() {
                *last = Some(report.stats);
            }
        }

        Ok(Evaluation {
            evaluated_at,
            payments,
            report,
        })
    }

    /// Counters from the most recent wall-clock evaluation, if any.
    pub fn last_stats(&self) -> Option<SessionStats> {
        self.last_stats.lock().ok().and_then(|last| *last)
    }
}
