//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles
//! one specific command type.

use async_trait::async_trait;

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{OrderCommand, OrderCommandPayload, OrderEvent};

mod approve_payout;
mod cancel_order;
mod create_order;
mod deliver_order;
mod mark_in_transit;
mod pay_order;
mod revoke_order;
mod ship_order;

pub use approve_payout::ApprovePayoutAction;
pub use cancel_order::CancelOrderAction;
pub use create_order::CreateOrderAction;
pub use deliver_order::DeliverOrderAction;
pub use mark_in_transit::MarkInTransitAction;
pub use pay_order::PayOrderAction;
pub use revoke_order::RevokeOrderAction;
pub use ship_order::ShipOrderAction;

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    CreateOrder(CreateOrderAction),
    CancelOrder(CancelOrderAction),
    PayOrder(PayOrderAction),
    ShipOrder(ShipOrderAction),
    MarkInTransit(MarkInTransitAction),
    DeliverOrder(DeliverOrderAction),
    ApprovePayout(ApprovePayoutAction),
    RevokeOrder(RevokeOrderAction),
}

/// Manual implementation of CommandHandler for CommandAction
#[async_trait]
impl CommandHandler for CommandAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        match self {
            CommandAction::CreateOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::CancelOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::PayOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::ShipOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::MarkInTransit(action) => action.execute(ctx, metadata).await,
            CommandAction::DeliverOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::ApprovePayout(action) => action.execute(ctx, metadata).await,
            CommandAction::RevokeOrder(action) => action.execute(ctx, metadata).await,
        }
    }
}

/// Convert OrderCommand to CommandAction
///
/// This is the ONLY place with a match on OrderCommandPayload.
impl From<&OrderCommand> for CommandAction {
    fn from(cmd: &OrderCommand) -> Self {
        match &cmd.payload {
            OrderCommandPayload::CreateOrder { .. } => {
                // CreateOrder is handled in OrdersManager to reserve the order number
                unreachable!("CreateOrder is built by OrdersManager, not From<&OrderCommand>")
            }
            OrderCommandPayload::ApprovePayout { .. } => {
                // ApprovePayout is handled in OrdersManager to inject the commission rate
                unreachable!("ApprovePayout is built by OrdersManager, not From<&OrderCommand>")
            }
            OrderCommandPayload::CancelOrder { order_id } => {
                CommandAction::CancelOrder(CancelOrderAction {
                    order_id: order_id.clone(),
                })
            }
            OrderCommandPayload::PayOrder { order_id, method } => {
                CommandAction::PayOrder(PayOrderAction {
                    order_id: order_id.clone(),
                    method: method.clone(),
                })
            }
            OrderCommandPayload::ShipOrder { order_id } => {
                CommandAction::ShipOrder(ShipOrderAction {
                    order_id: order_id.clone(),
                })
            }
            OrderCommandPayload::MarkInTransit { order_id } => {
                CommandAction::MarkInTransit(MarkInTransitAction {
                    order_id: order_id.clone(),
                })
            }
            OrderCommandPayload::DeliverOrder { order_id } => {
                CommandAction::DeliverOrder(DeliverOrderAction {
                    order_id: order_id.clone(),
                    confirm_receipt: false,
                })
            }
            OrderCommandPayload::ConfirmReceipt { order_id } => {
                CommandAction::DeliverOrder(DeliverOrderAction {
                    order_id: order_id.clone(),
                    confirm_receipt: true,
                })
            }
            OrderCommandPayload::RevokeOrder { order_id, reason } => {
                CommandAction::RevokeOrder(RevokeOrderAction {
                    order_id: order_id.clone(),
                    reason: reason.clone(),
                })
            }
        }
    }
}
