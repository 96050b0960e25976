//! MarkInTransit command handler
//!
//! Optional intermediate hop between SHIPPING and DELIVERED, recorded by
//! the carrier side (admin, or the supplier who shipped).

use async_trait::async_trait;

use crate::orders::traits::{
    CommandContext, CommandHandler, CommandMetadata, OrderError, require_transition,
};
use shared::models::Role;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// MarkInTransit action
#[derive(Debug, Clone)]
pub struct MarkInTransitAction {
    pub order_id: String,
}

#[async_trait]
impl CommandHandler for MarkInTransitAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        match metadata.actor_role {
            Role::Admin => {}
            Role::Supplier if snapshot.has_supplier(metadata.actor_id) => {}
            _ => {
                return Err(OrderError::Unauthorized(format!(
                    "account {} cannot update transit for order {}",
                    metadata.actor_id, self.order_id
                )));
            }
        }

        require_transition(
            snapshot.status,
            OrderStatus::InTransit,
            &[OrderStatus::Shipping],
        )?;

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor_id,
            metadata.actor_name.clone(),
            metadata.actor_role,
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderInTransit,
            EventPayload::OrderInTransit {},
        );

        Ok(vec![event])
    }
}
