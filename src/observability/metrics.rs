//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hotspot_requests_total` (counter): requests by route, status
//! - `hotspot_request_duration_seconds` (histogram): latency by route
//! - `hotspot_active_sessions` (gauge): sessions in the latest wall-clock pass
//! - `hotspot_session_skips` (gauge): payments skipped by that pass, by reason
//! - `hotspot_user_lookup_degraded` (gauge): placeholder identities in that pass
//! - `hotspot_store_events_total` (counter): store writes by kind
//! - `hotspot_store_payments` / `hotspot_store_users` (gauges)
//! - `hotspot_ws_clients` (gauge): connected dashboard clients

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::sessions::SessionStats;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    counter!(
        "hotspot_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("hotspot_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Publish the counters of a wall-clock evaluation. Each call replaces the
/// previous values.
pub fn record_session_stats(stats: &SessionStats) {
    gauge!("hotspot_active_sessions").set(stats.active as f64);
    gauge!("hotspot_session_skips", "reason" => "unknown_plan").set(stats.unknown_plan as f64);
    gauge!("hotspot_session_skips", "reason" => "expired").set(stats.expired as f64);
    gauge!("hotspot_session_skips", "reason" => "out_of_range").set(stats.out_of_range as f64);
    gauge!("hotspot_user_lookup_degraded").set(stats.degraded_lookups as f64);
}

pub fn record_store_event(kind: &'static str) {
    counter!("hotspot_store_events_total", "kind" => kind).increment(1);
}

pub fn record_store_size(payments: usize, users: usize) {
    gauge!("hotspot_store_payments").set(payments as f64);
    gauge!("hotspot_store_users").set(users as f64);
}

pub fn ws_client_connected() {
    gauge!("hotspot_ws_clients").increment(1.0);
}

pub fn ws_client_disconnected() {
    gauge!("hotspot_ws_clients").decrement(1.0);
}
