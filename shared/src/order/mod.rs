//! Order Lifecycle Types
//!
//! This module provides types for the order lifecycle engine:
//! - Commands: Requests from callers to drive the state machine
//! - Events: Immutable facts recorded after command processing
//! - Snapshots: Computed order state from the event stream

pub mod command;
pub mod event;
pub mod snapshot;
pub mod types;

// Re-exports
pub use command::{OrderCommand, OrderCommandPayload};
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use snapshot::{OrderSnapshot, OrderStatus};
pub use types::*;
