//! In-memory store with JSON snapshot persistence.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::observability::metrics;
use crate::payments::types::sort_newest_first;
use crate::payments::{PaymentRecord, PaymentResult, PaymentSource};
use crate::users::{LookupError, UserLookup, UserProfile};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Change notification emitted after every write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    PaymentRecorded(PaymentRecord),
    UserUpserted(UserProfile),
}

impl StoreEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreEvent::PaymentRecorded(_) => "payment",
            StoreEvent::UserUpserted(_) => "user",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot format error: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    users: Vec<UserProfile>,
    #[serde(default)]
    payments: Vec<PaymentRecord>,
}

/// Concurrent payment and user collections.
///
/// Cloning is cheap; clones share the same collections and event channel.
#[derive(Clone)]
pub struct MemoryStore {
    payments: Arc<DashMap<String, PaymentRecord>>,
    users: Arc<DashMap<String, UserProfile>>,
    events: broadcast::Sender<StoreEvent>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new(snapshot_path: Option<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            payments: Arc::new(DashMap::new()),
            users: Arc::new(DashMap::new()),
            events,
            snapshot_path,
        }
    }

    /// Load from the snapshot file if it exists; otherwise start empty.
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let snapshot: Snapshot = serde_json::from_reader(reader)?;

            for user in snapshot.users {
                store.users.insert(user.id.clone(), user);
            }
            for payment in snapshot.payments {
                store.payments.insert(payment.id.clone(), payment);
            }
            metrics::record_store_size(store.payments.len(), store.users.len());
            tracing::info!(
                path = %path.display(),
                payments = store.payments.len(),
                users = store.users.len(),
                "Loaded store snapshot"
            );
        }
        Ok(store)
    }

    /// Write the snapshot file, if a path is configured.
    pub fn save_to_file(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let mut users: Vec<UserProfile> = self.users.iter().map(|r| r.value().clone()).collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        let mut payments = self.all_payments();
        sort_newest_first(&mut payments);

        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &Snapshot { users, payments })?;
        tracing::info!(
            path = %path.display(),
            payments = self.payments.len(),
            users = self.users.len(),
            "Saved store snapshot"
        );
        Ok(())
    }

    /// Insert or replace a payment and notify subscribers.
    pub fn record_payment(&self, payment: PaymentRecord) {
        self.payments.insert(payment.id.clone(), payment.clone());
        self.publish(StoreEvent::PaymentRecorded(payment));
    }

    /// Insert or replace a user profile and notify subscribers.
    pub fn upsert_user(&self, user: UserProfile) {
        self.users.insert(user.id.clone(), user.clone());
        self.publish(StoreEvent::UserUpserted(user));
    }

    fn publish(&self, event: StoreEvent) {
        metrics::record_store_event(event.kind());
        metrics::record_store_size(self.payments.len(), self.users.len());
        // No subscribers is fine; nothing is listening yet.
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Every payment regardless of status, in no particular order.
    pub fn all_payments(&self) -> Vec<PaymentRecord> {
        self.payments.iter().map(|r| r.value().clone()).collect()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl PaymentSource for MemoryStore {
    async fn completed_payments(&self) -> PaymentResult<Vec<PaymentRecord>> {
        let mut completed: Vec<PaymentRecord> = self
            .payments
            .iter()
            .filter(|r| r.value().status.is_completed())
            .map(|r| r.value().clone())
            .collect();
        sort_newest_first(&mut completed);
        Ok(completed)
    }
}

#[async_trait]
impl UserLookup for MemoryStore {
    async fn find_user(&self, user_id: &str) -> Result<Option<UserProfile>, LookupError> {
        Ok(self.users.get(user_id).map(|r| r.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::PaymentStatus;
    use chrono::{TimeZone, Utc};

    fn payment(id: &str, hour: u32, status: PaymentStatus) -> PaymentRecord {
        PaymentRecord {
            id: id.to_string(),
            user_id: "u1".to_string(),
            amount: 10,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
            status,
        }
    }

    fn user(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            username: format!("{id}-name"),
            email: format!("{id}@example.com"),
        }
    }

    #[tokio::test]
    async fn test_completed_payments_filtered_and_sorted() {
        let store = MemoryStore::default();
        store.record_payment(payment("old", 8, PaymentStatus::Completed));
        store.record_payment(payment("pending", 11, PaymentStatus::Pending));
        store.record_payment(payment("new", 10, PaymentStatus::Completed));
        store.record_payment(payment("refund", 9, PaymentStatus::Refunded));

        let completed = store.completed_payments().await.unwrap();
        let ids: Vec<&str> = completed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        assert_eq!(store.payment_count(), 4);
    }

    #[tokio::test]
    async fn test_user_lookup() {
        let store = MemoryStore::default();
        store.upsert_user(user("u1"));

        assert_eq!(store.find_user("u1").await.unwrap(), Some(user("u1")));
        assert_eq!(store.find_user("u2").await.unwrap(), None);

        let mut renamed = user("u1");
        renamed.username = "renamed".to_string();
        store.upsert_user(renamed.clone());
        assert_eq!(store.find_user("u1").await.unwrap(), Some(renamed));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_writes_notify_subscribers() {
        let store = MemoryStore::default();
        let mut events = store.subscribe();

        store.upsert_user(user("u1"));
        store.record_payment(payment("p1", 8, PaymentStatus::Completed));

        assert_eq!(events.recv().await.unwrap(), StoreEvent::UserUpserted(user("u1")));
        let next = events.recv().await.unwrap();
        assert_eq!(next.kind(), "payment");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = MemoryStore::new(Some(path.clone()));
        store.upsert_user(user("u1"));
        store.record_payment(payment("p1", 8, PaymentStatus::Completed));
        store.record_payment(payment("p2", 9, PaymentStatus::Failed));
        store.save_to_file().unwrap();

        let loaded = MemoryStore::load_from_file(&path).unwrap();
        assert_eq!(loaded.payment_count(), 2);
        assert_eq!(loaded.user_count(), 1);
    }

    #[test]
    fn test_missing_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::load_from_file(&dir.path().join("absent.json")).unwrap();
        assert_eq!(store.payment_count(), 0);
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            MemoryStore::load_from_file(&path),
            Err(StoreError::Format(_))
        ));
    }
}
