//! OrderRevoked event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderRevoked applier
pub struct OrderRevokedApplier;

impl EventApplier for OrderRevokedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderRevoked { .. } = &event.payload {
            snapshot.status = OrderStatus::Revoked;
            snapshot.revoked_at = Some(event.timestamp);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
