//! ApprovePayout command handler
//!
//! Admin-only settlement step: credits every supplier on a delivered order
//! with its item totals minus commission, in one transaction. The status
//! stays DELIVERED; the payout flag and amounts are bookkept on the
//! snapshot. The commission remainder is platform revenue.

use async_trait::async_trait;
use tracing::info;

use crate::orders::money;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::models::Role;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus};

/// ApprovePayout action
#[derive(Debug, Clone)]
pub struct ApprovePayoutAction {
    pub order_id: String,
    /// Platform commission rate in [0, 1] (from config)
    pub commission_rate: f64,
}

#[async_trait]
impl CommandHandler for ApprovePayoutAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if metadata.actor_role != Role::Admin {
            return Err(OrderError::Unauthorized(
                "only admins can approve payouts".to_string(),
            ));
        }

        let snapshot = ctx.load_snapshot(&self.order_id)?;

        // Payout exists only post-delivery, exactly once
        if snapshot.status != OrderStatus::Delivered {
            return Err(OrderError::InvalidStateTransition {
                current: snapshot.status,
                attempted: OrderStatus::Delivered,
            });
        }
        if snapshot.payout_approved {
            return Err(OrderError::InvalidOperation(format!(
                "payout already approved for order {}",
                self.order_id
            )));
        }

        let (payouts, commission_amount) =
            money::payout_split(&snapshot.items, self.commission_rate);

        // Credit suppliers in ascending id order (payout_split is sorted)
        for payout in &payouts {
            if payout.amount > 0.0 {
                ctx.credit_wallet(payout.supplier_id, payout.amount)?;
            }
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
            OrderEventType::PayoutApproved,
            EventPayload::PayoutApproved {
                payouts,
                commission_amount,
            },
        );

        info!(
            order_id = %self.order_id,
            commission_amount,
            "Payout approved"
        );
        Ok(vec![event])
    }
}
