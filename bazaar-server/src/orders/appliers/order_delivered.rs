//! OrderDelivered event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderDelivered applier
pub struct OrderDeliveredApplier;

impl EventApplier for OrderDeliveredApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderDelivered {
            confirmed_by_consumer,
        } = &event.payload
        {
            snapshot.status = OrderStatus::Delivered;
            snapshot.delivered_at = Some(event.timestamp);
            if *confirmed_by_consumer {
                snapshot.confirmed_at = Some(event.timestamp);
            }

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
