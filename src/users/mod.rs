//! User profiles and the user lookup capability.
//!
//! # Data Flow
//! ```text
//! payment.user_id
//!     → UserLookup::find_user (store, or any backend implementing the trait)
//!     → DeadlineLookup (per-call deadline)
//!     → resolve_display (profile, or "Unknown" sentinel on miss/failure)
//! ```
//!
//! # Design Decisions
//! - A missing or unreachable user never fails the caller
//! - Degraded resolutions are reported back so callers can count them

pub mod lookup;

pub use lookup::{
    resolve_display, DeadlineLookup, DisplayIdentity, LookupError, Resolved, UserLookup,
    UserProfile, UNKNOWN_USER,
};
