//! OrderInTransit event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderInTransit applier
pub struct OrderInTransitApplier;

impl EventApplier for OrderInTransitApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderInTransit {} = &event.payload {
            snapshot.status = OrderStatus::InTransit;
            snapshot.in_transit_at = Some(event.timestamp);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
