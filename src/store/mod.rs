//! Payment and user storage.
//!
//! # Data Flow
//! ```text
//! admin ingestion (record_payment / upsert_user)
//!     → memory.rs (DashMap per collection)
//!     → broadcast StoreEvent to subscribers (dashboard relay)
//!
//! reads:
//!     PaymentSource::completed_payments → snapshot, newest first
//!     UserLookup::find_user → profile clone
//!
//! persistence:
//!     startup → load_from_file(snapshot_path)
//!     shutdown → save_to_file()
//! ```

pub mod memory;

pub use memory::{MemoryStore, StoreError, StoreEvent};
