//! ShipOrder command handler
//!
//! Moves a paid order into SHIPPING. Admins may ship any order; a supplier
//! may only ship an order whose items all belong to them.

use async_trait::async_trait;
use tracing::info;

use crate::orders::traits::{
    CommandContext, CommandHandler, CommandMetadata, OrderError, require_transition,
};
use shared::models::Role;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// ShipOrder action
#[derive(Debug, Clone)]
pub struct ShipOrderAction {
    pub order_id: String,
}

#[async_trait]
impl CommandHandler for ShipOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        let supplier_id = match metadata.actor_role {
            Role::Admin => None,
            Role::Supplier => {
                if !snapshot.all_items_from_supplier(metadata.actor_id) {
                    return Err(OrderError::Unauthorized(format!(
                        "supplier {} does not own all items of order {}",
                        metadata.actor_id, self.order_id
                    )));
                }
                Some(metadata.actor_id)
            }
            Role::Consumer => {
                return Err(OrderError::Unauthorized(
                    "consumers cannot ship orders".to_string(),
                ));
            }
        };

        require_transition(
            snapshot.status,
            OrderStatus::Shipping,
            &[OrderStatus::PendingShipment],
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
            OrderEventType::OrderShipped,
            EventPayload::OrderShipped { supplier_id },
        );

        info!(order_id = %self.order_id, supplier_id = ?supplier_id, "Order shipped");
        Ok(vec![event])
    }
}
