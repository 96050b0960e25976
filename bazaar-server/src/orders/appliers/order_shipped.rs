//! OrderShipped event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderShipped applier
pub struct OrderShippedApplier;

impl EventApplier for OrderShippedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderShipped { .. } = &event.payload {
            snapshot.status = OrderStatus::Shipping;
            snapshot.shipped_at = Some(event.timestamp);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
