//! PayOrder command handler
//!
//! Debits the consumer's wallet by the order total. The debit and the
//! transition to PENDING_SHIPMENT share one transaction: an insufficient
//! balance aborts with no side effects and the reservation stays in place.

use async_trait::async_trait;
use tracing::info;

use crate::orders::traits::{
    CommandContext, CommandHandler, CommandMetadata, OrderError, require_transition,
};
use shared::models::Role;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// PayOrder action
#[derive(Debug, Clone)]
pub struct PayOrderAction {
    pub order_id: String,
    pub method: String,
}

#[async_trait]
impl CommandHandler for PayOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Load existing snapshot
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        // 2. Only the owning consumer pays from their wallet
        if metadata.actor_role != Role::Consumer || snapshot.consumer_id != metadata.actor_id {
            return Err(OrderError::Unauthorized(format!(
                "account {} cannot pay order {}",
                metadata.actor_id, self.order_id
            )));
        }

        // 3. Payment only exists from PENDING_PAYMENT
        require_transition(
            snapshot.status,
            OrderStatus::PendingShipment,
            &[OrderStatus::PendingPayment],
        )?;

        // 4. Debit the wallet (fails with InsufficientFunds, never clamps).
        //    Zero-total orders have nothing to collect.
        if snapshot.total_amount > 0.0 {
            ctx.debit_wallet(snapshot.consumer_id, snapshot.total_amount)?;
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
            OrderEventType::OrderPaid,
            EventPayload::OrderPaid {
                method: self.method.clone(),
                amount: snapshot.total_amount,
            },
        );

        info!(
            order_id = %self.order_id,
            amount = snapshot.total_amount,
            method = %self.method,
            "Order paid"
        );
        Ok(vec![event])
    }
}
