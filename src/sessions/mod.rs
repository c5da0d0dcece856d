//! Active-session derivation.
//!
//! # Data Flow
//! ```text
//! PaymentSource::completed_payments (newest first)
//!     → expiry.rs (per payment: plan lookup, expiry, remaining time)
//!     → calculator.rs (filter, concurrent user resolution, input order kept)
//!     → service.rs (query entry point, default `now`, lookup deadline)
//!     → Vec<ActiveSession> / ActiveSessionReport
//! ```
//!
//! # Design Decisions
//! - Stateless: every call recomputes from the payment snapshot
//! - Unknown plans and expired windows are skipped, not errors; both are
//!   counted in `SessionStats`
//! - A payment source failure aborts the call; a user lookup failure only
//!   degrades its own entry

pub mod calculator;
pub mod expiry;
pub mod service;
pub mod types;

pub use calculator::{compute_active_sessions, ActiveSessionReport, SessionStats};
pub use expiry::{session_window, SessionWindow, SkipReason};
pub use service::{Evaluation, SessionService};
pub use types::ActiveSession;
