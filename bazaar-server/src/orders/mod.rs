//! Order Lifecycle Engine
//!
//! This module implements the order state machine as a command pipeline:
//!
//! - **manager**: Core OrdersManager for command processing and event generation
//! - **actions**: One CommandHandler per operation (validation + ledger effects)
//! - **appliers**: One EventApplier per event type (pure snapshot updates)
//! - **money**: Decimal arithmetic for totals, payouts and balance checks
//! - **traits**: CommandContext, handler/applier traits, OrderError
//!
//! # Architecture
//!
//! ```text
//! Command → OrdersManager → Action → Event(s) → Storage (redb)
//!                 ↓                       ↓
//!              Broadcast           Snapshot Update
//! ```
//!
//! Ledger effects (stock reservation, wallet debit/credit) run inside the
//! action, on the same write transaction that persists the events and
//! snapshots; the whole command commits or rolls back as one unit.

pub mod actions;
pub mod appliers;
pub mod manager;
pub mod money;
pub mod traits;

// Re-exports
pub use manager::{ManagerError, ManagerResult, OrdersManager};
pub use traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier, OrderError};

// Re-export shared types for convenience
pub use shared::order::{
    CommandError, CommandErrorCode, CommandResponse, EventPayload, OrderCommand,
    OrderCommandPayload, OrderEvent, OrderEventType, OrderSnapshot, OrderStatus,
};
