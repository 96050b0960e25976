//! OrdersManager - Core command processing and event generation
//!
//! This module handles:
//! - Command validation and processing
//! - Event generation with global sequence numbers
//! - Persistence to redb (transactional)
//! - Snapshot updates
//! - Event broadcasting (fire-and-forget)
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Reserve order number (CreateOrder only)
//!     ├─ 4. Convert command to action and execute
//!     │       (ledger reserve/release/debit/credit run here, same txn)
//!     ├─ 5. Apply events to snapshots via EventApplier
//!     ├─ 6. Persist events and snapshots
//!     ├─ 7. Mark command processed
//!     ├─ 8. Commit transaction
//!     ├─ 9. Broadcast event(s)
//!     └─ 10. Return response
//! ```
//!
//! A failure anywhere before commit drops the transaction, rolling back the
//! status transition together with every stock and wallet mutation.

mod error;
pub use error::*;

#[cfg(test)]
mod tests;

use super::actions::{ApprovePayoutAction, CommandAction, CreateOrderAction};
use super::appliers::EventAction;
use super::traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier};
use crate::storage::{Storage, StorageError};
use rand::Rng;
use redb::WriteTransaction;
use shared::order::{
    CommandResponse, OrderCommand, OrderCommandPayload, OrderEvent, OrderEventType, OrderSnapshot,
};
use std::path::Path;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 65536;

/// Attempts to find a free order number before giving up
const ORDER_NO_MAX_ATTEMPTS: usize = 8;

/// OrdersManager for command processing
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Clients use it to detect server restarts and trigger full resync.
pub struct OrdersManager {
    storage: Storage,
    event_tx: broadcast::Sender<OrderEvent>,
    /// Server instance epoch - unique ID generated on startup
    epoch: String,
    /// Platform commission rate in [0, 1], injected into payout actions
    commission_rate: f64,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<Storage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("epoch", &self.epoch)
            .field("commission_rate", &self.commission_rate)
            .finish()
    }
}

impl OrdersManager {
    /// Create a new OrdersManager with the given database path
    pub fn new(db_path: impl AsRef<Path>, commission_rate: f64) -> ManagerResult<Self> {
        let storage = Storage::open(db_path)?;
        Ok(Self::with_storage(storage, commission_rate))
    }

    /// Create an OrdersManager over existing storage
    pub fn with_storage(storage: Storage, commission_rate: f64) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, commission_rate, "OrdersManager started with new epoch");
        Self {
            storage,
            event_tx,
            epoch,
            commission_rate,
        }
    }

    /// Get the server epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to event broadcasts
    ///
    /// Send failures are ignored by the manager; a lagging or absent
    /// subscriber never affects command processing.
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Get a snapshot by order ID
    pub fn get_snapshot(&self, order_id: &str) -> ManagerResult<Option<OrderSnapshot>> {
        Ok(self.storage.get_snapshot(order_id)?)
    }

    /// Get all active order snapshots
    pub fn get_active_orders(&self) -> ManagerResult<Vec<OrderSnapshot>> {
        Ok(self.storage.get_active_orders()?)
    }

    /// Get the event stream for an order
    pub fn get_events(&self, order_id: &str) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.get_events(order_id)?)
    }

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: OrderCommand) -> CommandResponse {
        match self.process_command(cmd.clone()) {
            Ok((response, events)) => {
                // Broadcast events after successful commit
                for event in events {
                    let _ = self.event_tx.send(event);
                }
                response
            }
            Err(err) => CommandResponse::error(cmd.command_id, err.into()),
        }
    }

    /// Reserve a fresh unique order number inside the command transaction
    ///
    /// Format: `ORD` + UTC timestamp + 4-digit random suffix. The suffix can
    /// collide within a second, so the number is checked against the index
    /// table and regenerated; the check-then-insert is race-free under the
    /// single writer.
    fn reserve_order_number(&self, txn: &WriteTransaction) -> ManagerResult<String> {
        for _ in 0..ORDER_NO_MAX_ATTEMPTS {
            let candidate = format!(
                "ORD{}{:04}",
                chrono::Utc::now().format("%Y%m%d%H%M%S"),
                rand::thread_rng().gen_range(0..10_000)
            );
            if !self.storage.order_number_exists_txn(txn, &candidate)? {
                self.storage.record_order_number(txn, &candidate)?;
                return Ok(candidate);
            }
        }
        Err(ManagerError::Internal(
            "failed to allocate a unique order number".to_string(),
        ))
    }

    /// Process command and return response with events
    ///
    /// Uses the action-based architecture:
    /// 1. Convert command to CommandAction
    /// 2. Execute action to generate events (ledger effects included)
    /// 3. Apply events to snapshots via EventApplier
    /// 4. Persist everything atomically
    fn process_command(
        &self,
        cmd: OrderCommand,
    ) -> ManagerResult<(CommandResponse, Vec<OrderEvent>)> {
        tracing::info!(
            command_id = %cmd.command_id,
            actor_id = cmd.actor_id,
            actor_role = %cmd.actor_role,
            payload = ?cmd.payload,
            "Processing command"
        );

        // 1. Idempotency check (before transaction)
        if self.storage.is_command_processed(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 2. Begin write transaction
        let txn = self.storage.begin_write()?;

        // Double-check idempotency within the transaction
        if self
            .storage
            .is_command_processed_txn(&txn, &cmd.command_id)?
        {
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 3. Get current sequence for context initialization
        let current_sequence = self.storage.get_sequence_txn(&txn)?;

        let mut ctx = CommandContext::new(&txn, &self.storage, current_sequence);
        let metadata = CommandMetadata::from(&cmd);

        // 4. Convert to action and execute
        // CreateOrder gets a reserved order number; ApprovePayout gets the
        // configured commission rate. Everything else converts directly.
        let action: CommandAction = match &cmd.payload {
            OrderCommandPayload::CreateOrder { items } => {
                let order_no = self.reserve_order_number(&txn)?;
                tracing::info!(order_no = %order_no, "Reserved order number");
                CommandAction::CreateOrder(CreateOrderAction {
                    order_no,
                    items: items.clone(),
                })
            }
            OrderCommandPayload::ApprovePayout { order_id } => {
                CommandAction::ApprovePayout(ApprovePayoutAction {
                    order_id: order_id.clone(),
                    commission_rate: self.commission_rate,
                })
            }
            _ => (&cmd).into(),
        };
        let events = futures::executor::block_on(action.execute(&mut ctx, &metadata))
            .map_err(ManagerError::from)?;

        // 5. Apply events to snapshots
        for event in &events {
            let mut snapshot = ctx
                .load_snapshot(&event.order_id)
                .unwrap_or_else(|_| OrderSnapshot::new(event.order_id.clone()));

            let applier: EventAction = event.into();
            applier.apply(&mut snapshot, event);

            ctx.save_snapshot(snapshot);
        }

        // 6. Persist events
        for event in &events {
            self.storage.store_event(&txn, event)?;
        }

        // 7. Persist snapshots and update active order tracking
        for snapshot in ctx.modified_snapshots() {
            self.storage.store_snapshot(&txn, snapshot)?;

            // An order leaves the active index once it is terminal or fully
            // settled (payout approved)
            if snapshot.status.is_terminal() || snapshot.payout_approved {
                self.storage.mark_order_inactive(&txn, &snapshot.order_id)?;
            } else {
                self.storage.mark_order_active(&txn, &snapshot.order_id)?;
            }
        }

        // 8. Update sequence counter
        let max_sequence = events
            .iter()
            .map(|e| e.sequence)
            .max()
            .unwrap_or(current_sequence);
        if max_sequence > current_sequence {
            self.storage.set_sequence(&txn, max_sequence)?;
        }

        // 9. Mark command processed
        self.storage.mark_command_processed(&txn, &cmd.command_id)?;

        // 10. Commit transaction (ctx holds a borrow of txn)
        drop(ctx);
        txn.commit().map_err(StorageError::from)?;

        // Response carries the new order ID for CreateOrder
        let order_id = events
            .iter()
            .find(|e| e.event_type == OrderEventType::OrderCreated)
            .map(|e| e.order_id.clone());

        tracing::info!(
            command_id = %cmd.command_id,
            events = events.len(),
            "Command committed"
        );
        Ok((CommandResponse::success(cmd.command_id, order_id), events))
    }
}
