use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::payments::{PaymentRecord, PaymentStatus};
use crate::sessions::SessionStats;
use crate::users::UserProfile;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
    pub plans: usize,
    pub dashboard_clients: usize,
    /// Counters from the most recent evaluation by any caller.
    pub last_evaluation: Option<SessionStats>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub payments_tracked: usize,
    pub users_tracked: usize,
    pub evaluated_at: DateTime<Utc>,
    pub sessions: SessionStats,
}

/// Payment as submitted by an operator or the payment gateway callback.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub id: Option<String>,
    pub user_id: String,
    pub amount: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub status: Option<PaymentStatus>,
}

impl NewPayment {
    fn into_record(self) -> Result<PaymentRecord, ApiError> {
        if self.user_id.trim().is_empty() {
            return Err(ApiError::InvalidPayload("userId must not be empty".to_string()));
        }

        Ok(PaymentRecord {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            user_id: self.user_id,
            amount: self.amount,
            created_at: self.created_at.unwrap_or_else(Utc::now).trunc_subsecs(3),
            status: self.status.unwrap_or_default(),
        })
    }
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started_at.elapsed().as_secs(),
        plans: state.sessions.catalog().len(),
        dashboard_clients: state.push.receiver_count(),
        last_evaluation: state.sessions.last_stats(),
    })
}

pub async fn get_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let evaluation = state.sessions.evaluate(None).await?;

    Ok(Json(AnalyticsSummary {
        payments_tracked: state.store.payment_count(),
        users_tracked: state.store.user_count(),
        evaluated_at: evaluation.evaluated_at,
        sessions: evaluation.report.stats,
    }))
}

pub async fn record_payment(
    State(state): State<AppState>,
    payload: Result<Json<NewPayment>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentRecord>), ApiError> {
    let Json(payment) = payload?;
    let record = payment.into_record()?;

    if state.sessions.catalog().plan_for_amount(record.amount).is_none() {
        tracing::warn!(
            payment_id = %record.id,
            amount = record.amount,
            "Recorded payment matches no plan and will not open a session"
        );
    }

    tracing::info!(payment_id = %record.id, user_id = %record.user_id, "Payment recorded");
    state.store.record_payment(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn upsert_user(
    State(state): State<AppState>,
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(user) = payload?;
    if user.id.trim().is_empty() {
        return Err(ApiError::InvalidPayload("id must not be empty".to_string()));
    }

    tracing::info!(user_id = %user.id, "User upserted");
    state.store.upsert_user(user.clone());
    Ok(Json(user))
}
