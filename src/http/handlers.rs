//! Public read handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::dashboard::DashboardSnapshot;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::plans::PlanListing;
use crate::sessions::ActiveSession;

/// Optional evaluation instant (`?at=2024-05-01T12:00:00Z`).
#[derive(Debug, Default, Deserialize)]
pub struct EvaluationParams {
    pub at: Option<String>,
}

pub fn parse_instant(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    raw.map(|value| {
        DateTime::parse_from_rfc3339(value)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| ApiError::InvalidTimestamp(format!("'{value}': {e}")))
    })
    .transpose()
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /api/active-sessions`
pub async fn active_sessions(
    State(state): State<AppState>,
    Query(params): Query<EvaluationParams>,
) -> Result<Json<Vec<ActiveSession>>, ApiError> {
    let now = parse_instant(params.at.as_deref())?;
    let sessions = state.sessions.active_sessions(now).await?;
    Ok(Json(sessions))
}

/// `GET /api/dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<EvaluationParams>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    let now = parse_instant(params.at.as_deref())?;
    Ok(Json(state.dashboard.snapshot(now).await?))
}

/// `GET /api/plans`
pub async fn plans(State(state): State<AppState>) -> Json<Vec<PlanListing>> {
    Json(state.sessions.catalog().listings())
}
