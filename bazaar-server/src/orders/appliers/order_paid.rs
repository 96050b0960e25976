//! OrderPaid event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// OrderPaid applier
pub struct OrderPaidApplier;

impl EventApplier for OrderPaidApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderPaid { method, .. } = &event.payload {
            snapshot.status = OrderStatus::PendingShipment;
            snapshot.payment_method = Some(method.clone());
            snapshot.paid_at = Some(event.timestamp);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Role;
    use shared::order::OrderEventType;

    fn paid_event(order_id: &str, seq: u64) -> OrderEvent {
        OrderEvent::new(
            seq,
            order_id.to_string(),
            1,
            "Consumer".to_string(),
            Role::Consumer,
            "cmd-1".to_string(),
            Some(1234567890),
            OrderEventType::OrderPaid,
            EventPayload::OrderPaid {
                method: "WALLET".to_string(),
                amount: 100.0,
            },
        )
    }

    #[test]
    fn test_order_paid_sets_status_and_method() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        snapshot.total_amount = 100.0;
        let event = paid_event("order-1", 2);

        OrderPaidApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.status, OrderStatus::PendingShipment);
        assert_eq!(snapshot.payment_method.as_deref(), Some("WALLET"));
        assert_eq!(snapshot.paid_at, Some(event.timestamp));
        assert_eq!(snapshot.last_sequence, 2);
        assert!(snapshot.verify_checksum());
    }

    #[test]
    fn test_order_paid_preserves_totals() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        snapshot.total_amount = 42.5;
        snapshot.total_quantity = 3;

        OrderPaidApplier.apply(&mut snapshot, &paid_event("order-1", 2));

        assert_eq!(snapshot.total_amount, 42.5);
        assert_eq!(snapshot.total_quantity, 3);
    }
}
