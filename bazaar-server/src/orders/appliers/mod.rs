//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles
//! one specific event type. Appliers are PURE functions over the snapshot;
//! ledger side effects happen in the actions, inside the same transaction.

use enum_dispatch::enum_dispatch;

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent};

mod order_cancelled;
mod order_created;
mod order_delivered;
mod order_in_transit;
mod order_paid;
mod order_revoked;
mod order_shipped;
mod payout_approved;

pub use order_cancelled::OrderCancelledApplier;
pub use order_created::OrderCreatedApplier;
pub use order_delivered::OrderDeliveredApplier;
pub use order_in_transit::OrderInTransitApplier;
pub use order_paid::OrderPaidApplier;
pub use order_revoked::OrderRevokedApplier;
pub use order_shipped::OrderShippedApplier;
pub use payout_approved::PayoutApprovedApplier;

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    OrderCreated(OrderCreatedApplier),
    OrderCancelled(OrderCancelledApplier),
    OrderPaid(OrderPaidApplier),
    OrderShipped(OrderShippedApplier),
    OrderInTransit(OrderInTransitApplier),
    OrderDelivered(OrderDeliveredApplier),
    PayoutApproved(PayoutApprovedApplier),
    OrderRevoked(OrderRevokedApplier),
}

/// Convert OrderEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&OrderEvent> for EventAction {
    fn from(event: &OrderEvent) -> Self {
        match &event.payload {
            EventPayload::OrderCreated { .. } => EventAction::OrderCreated(OrderCreatedApplier),
            EventPayload::OrderCancelled { .. } => {
                EventAction::OrderCancelled(OrderCancelledApplier)
            }
            EventPayload::OrderPaid { .. } => EventAction::OrderPaid(OrderPaidApplier),
            EventPayload::OrderShipped { .. } => EventAction::OrderShipped(OrderShippedApplier),
            EventPayload::OrderInTransit {} => EventAction::OrderInTransit(OrderInTransitApplier),
            EventPayload::OrderDelivered { .. } => {
                EventAction::OrderDelivered(OrderDeliveredApplier)
            }
            EventPayload::PayoutApproved { .. } => {
                EventAction::PayoutApproved(PayoutApprovedApplier)
            }
            EventPayload::OrderRevoked { .. } => EventAction::OrderRevoked(OrderRevokedApplier),
        }
    }
}
