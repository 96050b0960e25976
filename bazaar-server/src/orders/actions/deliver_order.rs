//! DeliverOrder / ConfirmReceipt command handler
//!
//! Both commands land the order in DELIVERED and bump every product's sales
//! counter in the same transaction. The carrier side (admin/supplier) uses
//! DeliverOrder; the owning consumer uses ConfirmReceipt, which additionally
//! stamps `confirmed_at` on the snapshot.

use async_trait::async_trait;
use tracing::info;

use crate::orders::traits::{
    CommandContext, CommandHandler, CommandMetadata, OrderError, require_transition,
};
use shared::models::Role;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// DeliverOrder action (also backs ConfirmReceipt)
#[derive(Debug, Clone)]
pub struct DeliverOrderAction {
    pub order_id: String,
    /// True when the consumer confirms receipt themselves
    pub confirm_receipt: bool,
}

#[async_trait]
impl CommandHandler for DeliverOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        if self.confirm_receipt {
            // Receipt confirmation belongs to the owning consumer
            if metadata.actor_role != Role::Consumer || snapshot.consumer_id != metadata.actor_id {
                return Err(OrderError::Unauthorized(format!(
                    "account {} cannot confirm receipt of order {}",
                    metadata.actor_id, self.order_id
                )));
            }
        } else {
            match metadata.actor_role {
                Role::Admin => {}
                Role::Supplier if snapshot.has_supplier(metadata.actor_id) => {}
                _ => {
                    return Err(OrderError::Unauthorized(format!(
                        "account {} cannot deliver order {}",
                        metadata.actor_id, self.order_id
                    )));
                }
            }
        }

        require_transition(
            snapshot.status,
            OrderStatus::Delivered,
            &[OrderStatus::Shipping, OrderStatus::InTransit],
        )?;

        // Delivery is the moment a unit counts as sold
        for item in &snapshot.items {
            ctx.record_sales(item.product_id, item.quantity)?;
        }

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor_id,
            metadata.actor_name.clone(),
            metadata.actor_role,
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderDelivered,
            EventPayload::OrderDelivered {
                confirmed_by_consumer: self.confirm_receipt,
            },
        );

        info!(
            order_id = %self.order_id,
            confirmed_by_consumer = self.confirm_receipt,
            "Order delivered"
        );
        Ok(vec![event])
    }
}
