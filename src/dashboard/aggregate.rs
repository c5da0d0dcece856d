//! Dashboard metrics computed from payments and active sessions.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::payments::{PaymentRecord, PaymentResult};
use crate::sessions::{Evaluation, SessionService};
use crate::sessions::types::iso_millis;
use crate::users::{resolve_display, UserLookup};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A payment as listed in the dashboard feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPayment {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub amount: u32,
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

/// Earnings for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyEarnings {
    /// Three-letter month label.
    pub name: String,
    pub year: i32,
    pub earnings: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Sum of completed payment amounts.
    pub total_payments: u64,
    pub transaction_count: usize,
    pub active_sessions: usize,
    /// Distinct users holding at least one active session.
    pub active_users: usize,
    pub recent_payments: Vec<RecentPayment>,
    pub earnings_data: Vec<MonthlyEarnings>,
    #[serde(serialize_with = "iso_millis")]
    pub generated_at: DateTime<Utc>,
}

/// Per-month earnings for the `months` most recent months that have payments,
/// oldest first.
pub fn monthly_earnings(payments: &[PaymentRecord], months: usize) -> Vec<MonthlyEarnings> {
    let mut totals: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for payment in payments {
        let key = (payment.created_at.year(), payment.created_at.month0());
        *totals.entry(key).or_default() += u64::from(payment.amount);
    }

    let mut recent: Vec<MonthlyEarnings> = totals
        .into_iter()
        .rev()
        .take(months)
        .map(|((year, month0), earnings)| MonthlyEarnings {
            name: MONTH_ABBREVIATIONS[month0 as usize].to_string(),
            year,
            earnings,
        })
        .collect();
    recent.reverse();
    recent
}

/// Build a snapshot from an evaluation.
///
/// `evaluation.payments` must be newest first, as returned by the payment
/// source.
pub async fn build_snapshot(
    evaluation: &Evaluation,
    users: &dyn UserLookup,
    config: &DashboardConfig,
) -> DashboardSnapshot {
    let payments = &evaluation.payments;
    let sessions = &evaluation.report.sessions;

    let total_payments = payments.iter().map(|p| u64::from(p.amount)).sum();
    let active_users = sessions
        .iter()
        .map(|s| s.user_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let recent = &payments[..payments.len().min(config.recent_payments_limit)];
    let names = join_all(recent.iter().map(|p| resolve_display(users, &p.user_id))).await;
    let recent_payments = recent
        .iter()
        .zip(names)
        .map(|(payment, resolved)| RecentPayment {
            id: payment.id.clone(),
            user_id: payment.user_id.clone(),
            name: resolved.identity.name,
            amount: payment.amount,
            timestamp: payment.created_at,
        })
        .collect();

    DashboardSnapshot {
        total_payments,
        transaction_count: payments.len(),
        active_sessions: sessions.len(),
        active_users,
        recent_payments,
        earnings_data: monthly_earnings(payments, config.earnings_months),
        generated_at: evaluation.evaluated_at,
    }
}

/// Produces dashboard snapshots on demand.
#[derive(Clone)]
pub struct DashboardService {
    sessions: SessionService,
    config: DashboardConfig,
}

impl DashboardService {
    pub fn new(sessions: SessionService, config: DashboardConfig) -> Self {
        Self { sessions, config }
    }

    pub async fn snapshot(&self, now: Option<DateTime<Utc>>) -> PaymentResult<DashboardSnapshot> {
        let evaluation = self.sessions.evaluate(now).await?;
        let lookup = self.sessions.lookup();
        Ok(build_snapshot(&evaluation, &lookup, &self.config).await)
    }
}
