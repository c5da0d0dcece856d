//! Dashboard aggregation and real-time push.
//!
//! # Data Flow
//! ```text
//! SessionService::evaluate
//!     → aggregate.rs (totals, active users, recent payments, monthly earnings)
//!     → DashboardSnapshot
//!
//! MemoryStore write
//!     → StoreEvent (broadcast)
//!     → relay.rs (recompute snapshot once per event)
//!     → PushEvent (broadcast) → every WebSocket client
//! ```
//!
//! # Design Decisions
//! - One recomputation per store change, shared by all clients
//! - Last write wins: a lagging client skips stale updates
//! - No ordering guarantees beyond the order of the broadcast channel

pub mod aggregate;
pub mod relay;

pub use aggregate::{DashboardService, DashboardSnapshot, MonthlyEarnings, RecentPayment};
pub use relay::{DashboardRelay, PushEvent};
