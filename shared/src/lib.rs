//! Shared types for the Bazaar marketplace
//!
//! Common types used by the server and API clients: error codes and
//! response structures, entity models, and order command/event/snapshot
//! types for the lifecycle engine.

pub mod error;
pub mod models;
pub mod order;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
