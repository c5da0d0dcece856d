//! Active-session, dashboard and plan endpoints.

use std::sync::Arc;

use chrono::{TimeDelta, TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_empty_store_returns_empty_list() {
    let server = common::spawn_server(common::test_config()).await;

    let res = reqwest::get(server.url("/api/active-sessions")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_active_session_at_fixed_instant() {
    let server = common::spawn_server(common::test_config()).await;
    let paid_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    server.store().upsert_user(common::user("u1", "alice"));
    server.store().record_payment(common::payment("p1", "u1", 20, paid_at));

    let res = reqwest::get(server.url("/api/active-sessions?at=2024-05-01T12:00:00Z"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let sessions = body.as_array().unwrap();
    assert_eq!(sessions.len(), 1);

    let session = &sessions[0];
    assert_eq!(session["paymentId"], "p1");
    assert_eq!(session["userId"], "u1");
    assert_eq!(session["userName"], "alice");
    assert_eq!(session["userEmail"], "alice@example.com");
    assert_eq!(session["plan"], "four_hours");
    assert_eq!(session["amountPaid"], 20);
    assert_eq!(session["planDuration"], 4 * 3_600_000);
    assert_eq!(session["paymentDateTime"], "2024-05-01T10:00:00.000Z");
    assert_eq!(session["expiryTime"], "2024-05-01T14:00:00.000Z");
    assert_eq!(session["remainingTime"], 2 * 3_600_000);
    assert_eq!(session["status"], "completed");
}

#[tokio::test]
async fn test_session_closed_at_expiry_instant() {
    let server = common::spawn_server(common::test_config()).await;
    let paid_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    server.store().record_payment(common::payment("p1", "u1", 5, paid_at));

    let open: Value = reqwest::get(server.url("/api/active-sessions?at=2024-05-01T10:29:59Z"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(open.as_array().unwrap().len(), 1);
    assert_eq!(open[0]["remainingTime"], 1000);

    let closed: Value = reqwest::get(server.url("/api/active-sessions?at=2024-05-01T10:30:00Z"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(closed, serde_json::json!([]));
}

#[tokio::test]
async fn test_mixed_payments_filtered_and_ordered() {
    let server = common::spawn_server(common::test_config()).await;
    let now = Utc::now();
    let store = server.store();

    store.upsert_user(common::user("u1", "alice"));
    store.record_payment(common::payment("recent", "u1", 5, now - TimeDelta::minutes(5)));
    store.record_payment(common::payment("stranger", "ghost", 75, now - TimeDelta::hours(1)));
    store.record_payment(common::payment("unpriced", "u1", 999, now - TimeDelta::minutes(2)));
    store.record_payment(common::payment("lapsed", "u1", 10, now - TimeDelta::hours(3)));

    let body: Value = reqwest::get(server.url("/api/active-sessions"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let sessions = body.as_array().unwrap();

    let ids: Vec<&str> = sessions.iter().map(|s| s["paymentId"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["recent", "stranger"]);

    assert_eq!(sessions[1]["userName"], "Unknown");
    assert_eq!(sessions[1]["userEmail"], "Unknown");
    assert_eq!(sessions[1]["plan"], "one_day");

    for session in sessions {
        let remaining = session["remainingTime"].as_u64().unwrap();
        assert!(remaining > 0);
        assert!(remaining <= session["planDuration"].as_u64().unwrap());
    }
}

#[tokio::test]
async fn test_non_completed_payments_never_open_sessions() {
    let server = common::spawn_server(common::test_config()).await;
    let mut pending = common::payment("p1", "u1", 75, Utc::now());
    pending.status = hotspot_admin::payments::PaymentStatus::Pending;
    server.store().record_payment(pending);

    let body: Value = reqwest::get(server.url("/api/active-sessions"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_malformed_instant_rejected() {
    let server = common::spawn_server(common::test_config()).await;

    let res = reqwest::get(server.url("/api/active-sessions?at=yesterday"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("Invalid timestamp"));
}

#[tokio::test]
async fn test_payment_source_failure_is_distinct_from_empty() {
    let server =
        common::spawn_with_source(common::test_config(), Arc::new(common::FailingSource)).await;

    let res = reqwest::get(server.url("/api/active-sessions")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "message": "Error fetching payments" }));

    let res = reqwest::get(server.url("/api/dashboard")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_dashboard_snapshot() {
    let server = common::spawn_server(common::test_config()).await;
    let paid_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let store = server.store();

    store.upsert_user(common::user("u1", "alice"));
    store.record_payment(common::payment("p1", "u1", 20, paid_at));
    store.record_payment(common::payment("p2", "u1", 5, paid_at - TimeDelta::days(40)));

    let body: Value = reqwest::get(server.url("/api/dashboard?at=2024-05-01T12:00:00Z"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["totalPayments"], 25);
    assert_eq!(body["transactionCount"], 2);
    assert_eq!(body["activeSessions"], 1);
    assert_eq!(body["activeUsers"], 1);
    assert_eq!(body["recentPayments"][0]["id"], "p1");
    assert_eq!(body["recentPayments"][0]["name"], "alice");
    assert_eq!(body["earningsData"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_plan_listing_and_health() {
    let server = common::spawn_server(common::test_config()).await;

    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");

    let plans: Value = reqwest::get(server.url("/api/plans"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let plans = plans.as_array().unwrap();
    assert_eq!(plans.len(), 8);
    assert_eq!(plans[0]["price"], 5);
    assert_eq!(plans[7]["id"], "one_month");
}
