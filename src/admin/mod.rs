pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

/// Admin routes, all behind bearer-token auth. State is applied by the caller.
pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/analytics", get(get_analytics))
        .route("/admin/payments", post(record_payment))
        .route("/admin/users", post(upsert_user))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
