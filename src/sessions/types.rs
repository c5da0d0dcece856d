//! Active session view returned to dashboard clients.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::payments::{PaymentRecord, PaymentStatus};
use crate::plans::PlanId;
use crate::sessions::expiry::SessionWindow;
use crate::users::DisplayIdentity;

/// A payment whose access window is still open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub payment_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub plan: PlanId,
    pub amount_paid: u32,
    /// Plan duration in milliseconds.
    pub plan_duration: u64,
    #[serde(serialize_with = "iso_millis")]
    pub payment_date_time: DateTime<Utc>,
    #[serde(serialize_with = "iso_millis")]
    pub expiry_time: DateTime<Utc>,
    /// Milliseconds until expiry at evaluation time.
    pub remaining_time: u64,
    pub status: PaymentStatus,
}

impl ActiveSession {
    pub fn new(payment: &PaymentRecord, window: SessionWindow, identity: DisplayIdentity) -> Self {
        Self {
            payment_id: payment.id.clone(),
            user_id: payment.user_id.clone(),
            user_name: identity.name,
            user_email: identity.email,
            plan: window.plan.id,
            amount_paid: payment.amount,
            plan_duration: window.plan.duration_ms(),
            payment_date_time: payment.created_at.trunc_subsecs(3),
            expiry_time: window.expires_at,
            remaining_time: window.remaining_ms(),
            status: payment.status,
        }
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T12:20:00.000Z`.
pub(crate) fn iso_millis<S: Serializer>(t: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true))
}
