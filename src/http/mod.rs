//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware: request id, trace, timeout, CORS)
//!     → handlers.rs (active sessions, dashboard, plans, health)
//!     → websocket.rs (dashboard push channel)
//!     → admin routes (bearer-authenticated, when enabled)
//!     → error.rs (failures mapped to status + JSON message)
//! ```

pub mod error;
pub mod handlers;
pub mod server;
pub mod websocket;

pub use error::ApiError;
pub use server::{AppState, HttpServer};
