//! Payment record types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Processing state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Completed,
    Pending,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, PaymentStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One purchase made by a hotspot user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Payment identifier.
    pub id: String,
    /// User who paid.
    pub user_id: String,
    /// Amount paid, in whole currency units.
    pub amount: u32,
    /// Instant the payment completed.
    pub created_at: DateTime<Utc>,
    pub status: PaymentStatus,
}

/// Order payments newest first, breaking ties by id so the order is total.
pub fn sort_newest_first(payments: &mut [PaymentRecord]) {
    payments.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payment(id: &str, minute: u32) -> PaymentRecord {
        PaymentRecord {
            id: id.to_string(),
            user_id: "u1".to_string(),
            amount: 5,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
            status: PaymentStatus::Completed,
        }
    }

    #[test]
    fn test_payment_wire_format() {
        let json = r#"{
            "id": "p1",
            "userId": "u1",
            "amount": 20,
            "createdAt": "2024-05-01T10:00:00.000Z",
            "status": "completed"
        }"#;
        let decoded: PaymentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.user_id, "u1");
        assert_eq!(decoded.amount, 20);
        assert!(decoded.status.is_completed());

        let encoded = serde_json::to_value(&decoded).unwrap();
        assert_eq!(encoded["userId"], "u1");
        assert_eq!(encoded["status"], "completed");
    }

    #[test]
    fn test_status_parsing() {
        let status: PaymentStatus = serde_json::from_str("\"refunded\"").unwrap();
        assert_eq!(status, PaymentStatus::Refunded);
        assert!(!status.is_completed());
        assert_eq!(PaymentStatus::Pending.to_string(), "pending");
    }

    #[test]
    fn test_sort_newest_first() {
        let mut payments = vec![payment("a", 1), payment("c", 30), payment("b", 30)];
        sort_newest_first(&mut payments);
        let ids: Vec<&str> = payments.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }
}
