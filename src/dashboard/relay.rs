//! Store change → dashboard push relay.

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::dashboard::aggregate::{DashboardService, DashboardSnapshot};
use crate::payments::PaymentRecord;
use crate::store::StoreEvent;
use crate::users::UserProfile;

/// Event pushed to dashboard clients as `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum PushEvent {
    DashboardUpdate(DashboardSnapshot),
    PaymentUpdate(PaymentRecord),
    UserUpdate(UserProfile),
}

impl PushEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<StoreEvent> for PushEvent {
    fn from(event: StoreEvent) -> Self {
        match event {
            StoreEvent::PaymentRecorded(payment) => PushEvent::PaymentUpdate(payment),
            StoreEvent::UserUpserted(user) => PushEvent::UserUpdate(user),
        }
    }
}

/// Recomputes the dashboard on every store change and fans it out.
pub struct DashboardRelay {
    dashboard: DashboardService,
    events: broadcast::Receiver<StoreEvent>,
    publisher: broadcast::Sender<PushEvent>,
}

impl DashboardRelay {
    pub fn new(
        dashboard: DashboardService,
        events: broadcast::Receiver<StoreEvent>,
        publisher: broadcast::Sender<PushEvent>,
    ) -> Self {
        Self {
            dashboard,
            events,
            publisher,
        }
    }

    /// Run until shutdown or until the store's event channel closes.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!("Dashboard relay started");

        loop {
            tokio::select! {
                received = self.events.recv() => match received {
                    Ok(event) => self.handle(event).await,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Dashboard relay lagged behind store events");
                        self.publish_dashboard().await;
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("Store event channel closed");
                        break;
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!("Dashboard relay received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn handle(&self, event: StoreEvent) {
        tracing::debug!(kind = event.kind(), "Store change received");
        self.publish_dashboard().await;
        self.publish(event.into());
    }

    async fn publish_dashboard(&self) {
        match self.dashboard.snapshot(None).await {
            Ok(snapshot) => self.publish(PushEvent::DashboardUpdate(snapshot)),
            Err(e) => tracing::error!(error = %e, "Failed to recompute dashboard"),
        }
    }

    fn publish(&self, event: PushEvent) {
        // Err only means no client is connected.
        let _ = self.publisher.send(event);
    }
}
