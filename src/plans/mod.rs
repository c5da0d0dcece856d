//! Plan catalog subsystem.
//!
//! # Data Flow
//! ```text
//! [[plans]] in config (or the built-in table)
//!     → catalog.rs (PlanCatalog::new, rejects duplicate ids and prices)
//!     → Arc<PlanCatalog> (immutable, shared with sessions and dashboard)
//! ```
//!
//! # Design Decisions
//! - A plan is identified by `PlanId`, never by its price
//! - Price and duration are separate attributes of a plan
//! - The catalog resolves a paid amount to at most one plan; a catalog in
//!   which two plans share a price cannot be constructed

pub mod catalog;

pub use catalog::{
    CatalogError, Plan, PlanCatalog, PlanId, PlanListing, MAX_PLAN_DURATION_SECS,
};
