//! Shared types for the reservation backoffice
//!
//! Common types used across multiple crates including wire models,
//! error types, response structures, and reservation events.

pub mod error;
pub mod message;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{ReservationEvent, ReservationEventKind};
