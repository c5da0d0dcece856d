//! Batch derivation of active sessions from payment history.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::payments::PaymentRecord;
use crate::plans::PlanCatalog;
use crate::sessions::expiry::{session_window, SessionWindow, SkipReason};
use crate::sessions::types::ActiveSession;
use crate::users::{resolve_display, UserLookup};

/// Counters describing one derivation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub scanned: usize,
    pub active: usize,
    pub unknown_plan: usize,
    pub expired: usize,
    pub out_of_range: usize,
    /// Active sessions whose user resolved to the placeholder identity.
    pub degraded_lookups: usize,
}

impl SessionStats {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::UnknownPlan => self.unknown_plan += 1,
            SkipReason::Expired => self.expired += 1,
            SkipReason::OutOfRange => self.out_of_range += 1,
        }
    }
}

/// Active sessions plus the counters of the pass that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSessionReport {
    pub sessions: Vec<ActiveSession>,
    pub stats: SessionStats,
}

/// Derive the active sessions among `payments` at instant `now`.
///
/// `payments` is expected newest first; the output keeps that order.
/// User lookups run concurrently and never fail the batch.
pub async fn compute_active_sessions(
    payments: &[PaymentRecord],
    catalog: &PlanCatalog,
    users: &dyn UserLookup,
    now: DateTime<Utc>,
) -> ActiveSessionReport {
    let mut stats = SessionStats {
        scanned: payments.len(),
        ..SessionStats::default()
    };

    let candidates: Vec<(&PaymentRecord, SessionWindow)> = payments
        .iter()
        .filter_map(|payment| match session_window(payment, catalog, now) {
            Ok(window) => Some((payment, window)),
            Err(reason) => {
                tracing::trace!(
                    payment_id = %payment.id,
                    amount = payment.amount,
                    reason = reason.as_str(),
                    "Payment skipped"
                );
                stats.record_skip(reason);
                None
            }
        })
        .collect();

    let identities = join_all(
        candidates
            .iter()
            .map(|(payment, _)| resolve_display(users, &payment.user_id)),
    )
    .await;

    let sessions: Vec<ActiveSession> = candidates
        .into_iter()
        .zip(identities)
        .map(|((payment, window), resolved)| {
            if resolved.degraded {
                stats.degraded_lookups += 1;
            }
            ActiveSession::new(payment, window, resolved.identity)
        })
        .collect();

    stats.active = sessions.len();

    if stats.unknown_plan > 0 {
        tracing::debug!(
            count = stats.unknown_plan,
            "Payments with amounts matching no plan were skipped"
        );
    }

    ActiveSessionReport { sessions, stats }
}
