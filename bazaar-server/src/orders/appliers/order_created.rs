//! OrderCreated event applier
//!
//! Seeds the snapshot with the ordered items and totals. The create action
//! already stages an identical snapshot; applying the event on top keeps the
//! event stream authoritative and the applier idempotent.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderCreated applier
pub struct OrderCreatedApplier;

impl EventApplier for OrderCreatedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderCreated {
            order_no,
            consumer_id,
            items,
            total_amount,
            total_quantity,
        } = &event.payload
        {
            snapshot.order_no = order_no.clone();
            snapshot.consumer_id = *consumer_id;
            snapshot.items = items.clone();
            snapshot.total_amount = *total_amount;
            snapshot.total_quantity = *total_quantity;
            snapshot.status = OrderStatus::PendingPayment;
            snapshot.created_at = event.client_timestamp.unwrap_or(event.timestamp);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
