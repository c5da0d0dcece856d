//! Hotspot billing admin service.
//!
//! Derives the currently active access sessions of a WiFi hotspot from its
//! payment ledger and a fixed plan catalog, and serves them alongside a live
//! dashboard to the admin UI.

// Domain
pub mod plans;
pub mod payments;
pub mod users;
pub mod sessions;
pub mod store;
pub mod dashboard;

// Serving
pub mod admin;
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
