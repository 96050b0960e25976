//! PayoutApproved event applier
//!
//! Does not change the order status: the order stays DELIVERED and the
//! payout bookkeeping fields are set on the snapshot.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// PayoutApproved applier
pub struct PayoutApprovedApplier;

impl EventApplier for PayoutApprovedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::PayoutApproved {
            payouts,
            commission_amount,
        } = &event.payload
        {
            snapshot.payout_approved = true;
            snapshot.payouts = Some(payouts.clone());
            snapshot.commission_amount = Some(*commission_amount);
            snapshot.payout_at = Some(event.timestamp);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
