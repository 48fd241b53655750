//! Data models
//!
//! Shared between edge-server and frontend (via API).
//! All IDs are `i64`; all timestamps are Unix millis.

pub mod dining_table;
pub mod reservation;
pub mod schedule;

// Re-exports
pub use dining_table::*;
pub use reservation::*;
pub use schedule::*;
