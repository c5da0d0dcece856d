//! Access window computation for a single payment.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

use crate::payments::PaymentRecord;
use crate::plans::{Plan, PlanCatalog};

/// Why a payment does not yield an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The amount paid matches no plan in the catalog.
    UnknownPlan,
    /// The access window has elapsed.
    Expired,
    /// The expiry instant is not representable.
    OutOfRange,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::UnknownPlan => "unknown_plan",
            SkipReason::Expired => "expired",
            SkipReason::OutOfRange => "out_of_range",
        }
    }
}

/// The still-open access window bought by a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub plan: Plan,
    /// Whole milliseconds.
    pub expires_at: DateTime<Utc>,
    /// Whole milliseconds, at least one.
    pub remaining: TimeDelta,
}

impl SessionWindow {
    pub fn remaining_ms(&self) -> u64 {
        u64::try_from(self.remaining.num_milliseconds()).unwrap_or(0)
    }
}

/// Compute the access window of `payment` as seen at `now`.
///
/// Both instants are taken at millisecond precision, the precision of the
/// wire format. A window whose expiry is at or before `now` is expired.
pub fn session_window(
    payment: &PaymentRecord,
    catalog: &PlanCatalog,
    now: DateTime<Utc>,
) -> Result<SessionWindow, SkipReason> {
    let plan = *catalog
        .plan_for_amount(payment.amount)
        .ok_or(SkipReason::UnknownPlan)?;

    let now = now.trunc_subsecs(3);
    let expires_at = payment
        .created_at
        .trunc_subsecs(3)
        .checked_add_signed(plan.duration)
        .ok_or(SkipReason::OutOfRange)?;

    if expires_at <= now {
        return Err(SkipReason::Expired);
    }

    Ok(SessionWindow {
        plan,
        expires_at,
        remaining: expires_at - now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::PaymentStatus;
    use crate::plans::PlanId;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn paid(amount: u32, created_at: DateTime<Utc>) -> PaymentRecord {
        PaymentRecord {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            amount,
            created_at,
            status: PaymentStatus::Completed,
        }
    }

    #[test]
    fn test_open_window() {
        let catalog = PlanCatalog::default();
        let payment = paid(5, now() - TimeDelta::minutes(10));

        let window = session_window(&payment, &catalog, now()).unwrap();
        assert_eq!(window.plan.id, PlanId::HalfHour);
        assert_eq!(window.expires_at, now() + TimeDelta::minutes(20));
        assert_eq!(window.remaining_ms(), 1_200_000);
    }

    #[test]
    fn test_expired_window() {
        let catalog = PlanCatalog::default();
        let payment = paid(5, now() - TimeDelta::minutes(40));
        assert_eq!(
            session_window(&payment, &catalog, now()),
            Err(SkipReason::Expired)
        );

        let long_gone = paid(950, now() - TimeDelta::days(400));
        assert_eq!(
            session_window(&long_gone, &catalog, now()),
            Err(SkipReason::Expired)
        );
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let catalog = PlanCatalog::default();
        let exactly_now = paid(5, now() - TimeDelta::minutes(30));
        assert_eq!(
            session_window(&exactly_now, &catalog, now()),
            Err(SkipReason::Expired)
        );

        let one_ms_left = paid(5, now() - TimeDelta::minutes(30) + TimeDelta::milliseconds(1));
        let window = session_window(&one_ms_left, &catalog, now()).unwrap();
        assert_eq!(window.remaining_ms(), 1);
    }

    #[test]
    fn test_sub_millisecond_remainder_is_expired() {
        let catalog = PlanCatalog::default();
        let almost_gone = paid(
            5,
            now() - TimeDelta::minutes(30) + TimeDelta::microseconds(400),
        );
        assert_eq!(
            session_window(&almost_gone, &catalog, now()),
            Err(SkipReason::Expired)
        );

        let late_now = now() + TimeDelta::microseconds(700);
        let one_ms_left = paid(5, now() - TimeDelta::minutes(30) + TimeDelta::milliseconds(1));
        let window = session_window(&one_ms_left, &catalog, late_now).unwrap();
        assert_eq!(window.remaining, TimeDelta::milliseconds(1));
        assert_eq!(window.expires_at, now() + TimeDelta::milliseconds(1));
    }

    #[test]
    fn test_unknown_plan_ignores_timing() {
        let catalog = PlanCatalog::default();
        for created_at in [now(), now() - TimeDelta::days(1), now() + TimeDelta::days(1)] {
            assert_eq!(
                session_window(&paid(999, created_at), &catalog, now()),
                Err(SkipReason::UnknownPlan)
            );
        }
    }

    #[test]
    fn test_future_payment_counts_full_window_from_creation() {
        let catalog = PlanCatalog::default();
        let payment = paid(10, now() + TimeDelta::minutes(5));
        let window = session_window(&payment, &catalog, now()).unwrap();
        assert_eq!(window.expires_at, payment.created_at + TimeDelta::hours(2));
        assert_eq!(window.remaining, TimeDelta::minutes(125));
    }

    #[test]
    fn test_unrepresentable_expiry() {
        let catalog = PlanCatalog::default();
        let payment = paid(950, DateTime::<Utc>::MAX_UTC);
        assert_eq!(
            session_window(&payment, &catalog, now()),
            Err(SkipReason::OutOfRange)
        );
    }
}
