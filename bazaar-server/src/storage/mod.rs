//! redb-based storage layer for the marketplace
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `events` | `(order_id, sequence)` | `OrderEvent` | Event stream (append-only) |
//! | `snapshots` | `order_id` | `OrderSnapshot` | Snapshot cache |
//! | `active_orders` | `order_id` | `()` | Active order index |
//! | `processed_commands` | `command_id` | `()` | Idempotency check |
//! | `counters` | name | `u64` | Global sequence + entity id counters |
//! | `order_numbers` | `order_no` | `()` | Order number uniqueness |
//! | `products` | `product_id` | `Product` | Inventory ledger rows |
//! | `accounts` | `account_id` | `Account` | Wallet ledger rows |
//! | `return_requests` | `return_id` | `ReturnRequest` | Return workflow |
//! | `active_returns` | `(order_id, product_id)` | `return_id` | Active return uniqueness |
//! | `reviews` | `review_id` | `ProductReview` | Product reviews |
//! | `review_keys` | `(order_id, product_id, role)` | `review_id` | One review per (item, author role) |
//!
//! # Transaction boundary
//!
//! Every mutating operation runs in one write transaction: an order status
//! transition and the stock/wallet rows it touches commit or roll back
//! together. redb serializes writers, so conflicting operations on the same
//! product or account row cannot interleave.
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), keeping the database file consistent across
//! crashes and power loss.

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use shared::order::{OrderEvent, OrderSnapshot};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for storing events: key = (order_id, sequence), value = JSON-serialized OrderEvent
pub(crate) const EVENTS_TABLE: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("events");

/// Table for storing snapshots: key = order_id, value = JSON-serialized OrderSnapshot
pub(crate) const SNAPSHOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Table for tracking active orders: key = order_id, value = empty (existence check)
pub(crate) const ACTIVE_ORDERS_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("active_orders");

/// Table for tracking processed commands: key = command_id, value = empty (idempotency)
pub(crate) const PROCESSED_COMMANDS_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("processed_commands");

/// Table for counters: key = counter name, value = u64
pub(crate) const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Table for order number uniqueness: key = order_no, value = empty
pub(crate) const ORDER_NUMBERS_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("order_numbers");

/// Table for products (inventory ledger rows): key = product_id, value = JSON
pub(crate) const PRODUCTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("products");

/// Table for accounts (wallet ledger rows): key = account_id, value = JSON
pub(crate) const ACCOUNTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("accounts");

/// Table for return requests: key = return_id, value = JSON
pub(crate) const RETURN_REQUESTS_TABLE: TableDefinition<u64, &[u8]> =
    TableDefinition::new("return_requests");

/// Table for active return uniqueness: key = (order_id, product_id), value = return_id
pub(crate) const ACTIVE_RETURNS_TABLE: TableDefinition<(&str, u64), u64> =
    TableDefinition::new("active_returns");

/// Table for reviews: key = review_id, value = JSON
pub(crate) const REVIEWS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("reviews");

/// Table for review uniqueness: key = (order_id, product_id, author_role), value = review_id
pub(crate) const REVIEW_KEYS_TABLE: TableDefinition<(&str, u64, &str), u64> =
    TableDefinition::new("review_keys");

const SEQUENCE_KEY: &str = "seq";

/// Counter names for entity id allocation
pub(crate) const PRODUCT_ID_COUNTER: &str = "product_id";
pub(crate) const ACCOUNT_ID_COUNTER: &str = "account_id";
pub(crate) const RETURN_ID_COUNTER: &str = "return_id";
pub(crate) const REVIEW_ID_COUNTER: &str = "review_id";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for shared::AppError {
    fn from(err: StorageError) -> Self {
        shared::AppError::database(err.to_string())
    }
}

/// Marketplace storage backed by redb
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(EVENTS_TABLE)?;
            let _ = write_txn.open_table(SNAPSHOTS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
            let _ = write_txn.open_table(ORDER_NUMBERS_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(ACCOUNTS_TABLE)?;
            let _ = write_txn.open_table(RETURN_REQUESTS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_RETURNS_TABLE)?;
            let _ = write_txn.open_table(REVIEWS_TABLE)?;
            let _ = write_txn.open_table(REVIEW_KEYS_TABLE)?;

            // Initialize sequence counter if not exists
            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            if counters.get(SEQUENCE_KEY)?.is_none() {
                counters.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction
    pub(crate) fn begin_read(&self) -> StorageResult<redb::ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    // ========== Sequence Operations ==========

    /// Get the current global sequence (within transaction)
    pub fn get_sequence_txn(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let table = txn.open_table(COUNTERS_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Get the current global sequence (read-only)
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Set sequence number (within transaction)
    pub fn set_sequence(&self, txn: &WriteTransaction, sequence: u64) -> StorageResult<()> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        table.insert(SEQUENCE_KEY, sequence)?;
        Ok(())
    }

    /// Allocate the next id for the named entity counter (within transaction)
    pub fn next_id(&self, txn: &WriteTransaction, counter: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(counter)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(counter, next)?;
        Ok(next)
    }

    // ========== Command Idempotency ==========

    /// Check if a command has been processed
    pub fn is_command_processed(&self, command_id: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    /// Check if a command has been processed (within transaction)
    pub fn is_command_processed_txn(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    /// Mark a command as processed
    pub fn mark_command_processed(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        table.insert(command_id, ())?;
        Ok(())
    }

    // ========== Order Number Uniqueness ==========

    /// Check whether an order number is already taken (within transaction)
    pub fn order_number_exists_txn(
        &self,
        txn: &WriteTransaction,
        order_no: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(ORDER_NUMBERS_TABLE)?;
        Ok(table.get(order_no)?.is_some())
    }

    /// Record an order number as taken (within transaction)
    ///
    /// Rolls back with the transaction, so a failed order creation does not
    /// burn the number.
    pub fn record_order_number(
        &self,
        txn: &WriteTransaction,
        order_no: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ORDER_NUMBERS_TABLE)?;
        table.insert(order_no, ())?;
        Ok(())
    }

    // ========== Event Operations ==========

    /// Store an event (within transaction)
    pub fn store_event(&self, txn: &WriteTransaction, event: &OrderEvent) -> StorageResult<()> {
        let mut table = txn.open_table(EVENTS_TABLE)?;
        let bytes = serde_json::to_vec(event)?;
        table.insert((event.order_id.as_str(), event.sequence), bytes.as_slice())?;
        Ok(())
    }

    /// Get all events for an order, in sequence order
    pub fn get_events(&self, order_id: &str) -> StorageResult<Vec<OrderEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;
        let mut events = Vec::new();
        for entry in table.range((order_id, 0)..=(order_id, u64::MAX))? {
            let (_, value) = entry?;
            events.push(serde_json::from_slice(value.value())?);
        }
        Ok(events)
    }

    // ========== Snapshot Operations ==========

    /// Store a snapshot (within transaction)
    pub fn store_snapshot(
        &self,
        txn: &WriteTransaction,
        snapshot: &OrderSnapshot,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SNAPSHOTS_TABLE)?;
        let bytes = serde_json::to_vec(snapshot)?;
        table.insert(snapshot.order_id.as_str(), bytes.as_slice())?;
        Ok(())
    }

    /// Get a snapshot by order ID (read-only)
    pub fn get_snapshot(&self, order_id: &str) -> StorageResult<Option<OrderSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SNAPSHOTS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Get a snapshot by order ID (within transaction)
    pub fn get_snapshot_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<OrderSnapshot>> {
        let table = txn.open_table(SNAPSHOTS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    // ========== Active Order Tracking ==========

    /// Mark an order as active (within transaction)
    pub fn mark_order_active(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        table.insert(order_id, ())?;
        Ok(())
    }

    /// Remove an order from the active index (within transaction)
    pub fn mark_order_inactive(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        table.remove(order_id)?;
        Ok(())
    }

    /// Get all active order snapshots
    pub fn get_active_orders(&self) -> StorageResult<Vec<OrderSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let snapshots = read_txn.open_table(SNAPSHOTS_TABLE)?;

        let mut result = Vec::new();
        for entry in active.iter()? {
            let (key, _) = entry?;
            if let Some(guard) = snapshots.get(key.value())? {
                result.push(serde_json::from_slice(guard.value())?);
            }
        }
        Ok(result)
    }
}
