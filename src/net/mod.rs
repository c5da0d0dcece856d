//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! [listener.tls] in config
//!     → tls.rs (PEM certificate + key → RustlsConfig)
//!     → HttpServer::run_tls
//! ```

pub mod tls;
