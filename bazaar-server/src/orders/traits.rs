//! Core traits and context for the order command pipeline
//!
//! - [`CommandHandler`]: one implementation per command, produces events
//! - [`EventApplier`]: one implementation per event type, pure snapshot update
//! - [`CommandContext`]: the write transaction plus staged snapshots; all
//!   ledger mutations go through it so they commit or roll back with the
//!   order status transition

use crate::inventory;
use crate::orders::appliers::{
    EventAction, OrderCancelledApplier, OrderCreatedApplier, OrderDeliveredApplier,
    OrderInTransitApplier, OrderPaidApplier, OrderRevokedApplier, OrderShippedApplier,
    PayoutApprovedApplier,
};
use crate::storage::{Storage, StorageError};
use crate::wallet;
use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use redb::WriteTransaction;
use shared::models::{Account, Product, Role};
use shared::order::{OrderCommand, OrderEvent, OrderSnapshot, OrderStatus};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while executing a command
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("Product {0} is not on sale")]
    ProductUnavailable(u64),

    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: u64,
        requested: i64,
        available: i64,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(u64),

    #[error(
        "Insufficient funds for account {account_id}: required {required:.2}, available {available:.2}"
    )]
    InsufficientFunds {
        account_id: u64,
        required: f64,
        available: f64,
    },

    #[error("Invalid state transition: {current} -> {attempted}")]
    InvalidStateTransition {
        current: OrderStatus,
        attempted: OrderStatus,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Order has no items")]
    EmptyOrder,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for OrderError {
    fn from(err: StorageError) -> Self {
        OrderError::Storage(err.to_string())
    }
}

impl From<OrderError> for shared::AppError {
    fn from(err: OrderError) -> Self {
        use shared::ErrorCode;

        let code = match &err {
            OrderError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            OrderError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            OrderError::ProductUnavailable(_) => ErrorCode::ProductUnavailable,
            OrderError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            OrderError::AccountNotFound(_) => ErrorCode::AccountNotFound,
            OrderError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            OrderError::InvalidStateTransition { .. } => ErrorCode::InvalidStateTransition,
            OrderError::Unauthorized(_) => ErrorCode::PermissionDenied,
            OrderError::EmptyOrder => ErrorCode::EmptyOrder,
            OrderError::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            OrderError::InvalidAmount => ErrorCode::InvalidAmount,
            OrderError::InvalidOperation(_) => ErrorCode::ValidationFailed,
            OrderError::Storage(_) => ErrorCode::DatabaseError,
        };
        shared::AppError::with_message(code, err.to_string())
    }
}

/// Command metadata extracted once per command
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub actor_id: u64,
    pub actor_name: String,
    pub actor_role: Role,
    /// Client timestamp (Unix millis)
    pub timestamp: i64,
}

impl From<&OrderCommand> for CommandMetadata {
    fn from(cmd: &OrderCommand) -> Self {
        Self {
            command_id: cmd.command_id.clone(),
            actor_id: cmd.actor_id,
            actor_name: cmd.actor_name.clone(),
            actor_role: cmd.actor_role,
            timestamp: cmd.timestamp,
        }
    }
}

/// Execution context for a single command
///
/// Wraps the write transaction, the sequence allocator, and the snapshots
/// modified during this command. Ledger passthroughs operate on the same
/// transaction, giving the all-or-nothing boundary the state machine needs.
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a Storage,
    sequence: u64,
    snapshots: HashMap<String, OrderSnapshot>,
}

impl<'a> CommandContext<'a> {
    pub fn new(txn: &'a WriteTransaction, storage: &'a Storage, current_sequence: u64) -> Self {
        Self {
            txn,
            storage,
            sequence: current_sequence,
            snapshots: HashMap::new(),
        }
    }

    /// Allocate the next event sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// The highest sequence number allocated so far
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Create a fresh snapshot (not yet staged)
    pub fn create_snapshot(&self, order_id: String) -> OrderSnapshot {
        OrderSnapshot::new(order_id)
    }

    /// Load a snapshot: staged version first, then storage
    pub fn load_snapshot(&self, order_id: &str) -> Result<OrderSnapshot, OrderError> {
        if let Some(snapshot) = self.snapshots.get(order_id) {
            return Ok(snapshot.clone());
        }
        self.storage
            .get_snapshot_txn(self.txn, order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// Stage a modified snapshot for persistence at commit
    pub fn save_snapshot(&mut self, snapshot: OrderSnapshot) {
        self.snapshots.insert(snapshot.order_id.clone(), snapshot);
    }

    /// Snapshots modified during this command
    pub fn modified_snapshots(&self) -> impl Iterator<Item = &OrderSnapshot> {
        self.snapshots.values()
    }

    // ========== Inventory ledger passthrough ==========

    pub fn load_product(&self, product_id: u64) -> Result<Product, OrderError> {
        inventory::get(self.txn, product_id)
    }

    pub fn reserve_stock(&self, product_id: u64, quantity: i32) -> Result<Product, OrderError> {
        inventory::reserve(self.txn, product_id, quantity)
    }

    pub fn release_stock(&self, product_id: u64, quantity: i32) -> Result<Product, OrderError> {
        inventory::release(self.txn, product_id, quantity)
    }

    pub fn record_sales(&self, product_id: u64, quantity: i32) -> Result<(), OrderError> {
        inventory::record_sales(self.txn, product_id, quantity)
    }

    // ========== Wallet ledger passthrough ==========

    pub fn load_account(&self, account_id: u64) -> Result<Account, OrderError> {
        wallet::get(self.txn, account_id)
    }

    pub fn debit_wallet(&self, account_id: u64, amount: f64) -> Result<Account, OrderError> {
        wallet::debit(self.txn, account_id, amount)
    }

    pub fn credit_wallet(&self, account_id: u64, amount: f64) -> Result<Account, OrderError> {
        wallet::credit(self.txn, account_id, amount)
    }
}

/// Command handler - converts a validated command into events
#[async_trait]
pub trait CommandHandler {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError>;
}

/// Event applier - pure function applying one event type to a snapshot
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent);
}

/// Validate a lifecycle transition against the allowed-from set
///
/// Fails with `InvalidStateTransition` carrying both the current and the
/// attempted state, so callers and tests can see exactly what was refused.
pub fn require_transition(
    current: OrderStatus,
    attempted: OrderStatus,
    allowed_from: &[OrderStatus],
) -> Result<(), OrderError> {
    if allowed_from.contains(&current) {
        Ok(())
    } else {
        Err(OrderError::InvalidStateTransition { current, attempted })
    }
}
