//! CancelOrder command handler
//!
//! Cancels an unpaid order and releases every reserved unit back to the
//! inventory ledger, in the same transaction as the status transition.

use async_trait::async_trait;
use tracing::info;

use crate::orders::traits::{
    CommandContext, CommandHandler, CommandMetadata, OrderError, require_transition,
};
use shared::models::Role;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus, StockMovement};

/// CancelOrder action
#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub order_id: String,
}

#[async_trait]
impl CommandHandler for CancelOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Load existing snapshot
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        // 2. Only the owning consumer or an admin may cancel
        let is_owner =
            metadata.actor_role == Role::Consumer && snapshot.consumer_id == metadata.actor_id;
        if !is_owner && metadata.actor_role != Role::Admin {
            return Err(OrderError::Unauthorized(format!(
                "account {} cannot cancel order {}",
                metadata.actor_id, self.order_id
            )));
        }

        // 3. Cancellation only exists before payment
        require_transition(
            snapshot.status,
            OrderStatus::Cancelled,
            &[OrderStatus::PendingPayment],
        )?;

        // 4. Release every reserved line
        let mut released = Vec::with_capacity(snapshot.items.len());
        for item in &snapshot.items {
            ctx.release_stock(item.product_id, item.quantity)?;
            released.push(StockMovement {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }

        // 5. Allocate sequence and create event
        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor_id,
            metadata.actor_name.clone(),
            metadata.actor_role,
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderCancelled,
            EventPayload::OrderCancelled { released },
        );

        info!(order_id = %self.order_id, "Order cancelled, stock released");
        Ok(vec![event])
    }
}
