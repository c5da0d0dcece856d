//! Payment records and the payment source capability.
//!
//! Payments are written by the payment-processing side of the system and are
//! read-only here. Everything downstream (session derivation, dashboard)
//! consumes them through [`PaymentSource`].

pub mod source;
pub mod types;

pub use source::{PaymentError, PaymentResult, PaymentSource};
pub use types::{PaymentRecord, PaymentStatus};
