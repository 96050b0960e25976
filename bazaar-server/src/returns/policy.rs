//! Compensation policy for completed returns
//!
//! What a completed return does to wallet and stock is deployment policy,
//! not state-machine logic, so it hangs off a trait. Policies run inside
//! the same write transaction as the status change.

use crate::orders::traits::OrderError;
use crate::{inventory, wallet};
use redb::WriteTransaction;
use shared::models::ReturnRequest;
use shared::order::OrderSnapshot;

/// Hook invoked when a return request reaches COMPLETED
pub trait RefundPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Apply compensating wallet/stock effects for a completed return
    fn on_completed(
        &self,
        txn: &WriteTransaction,
        request: &ReturnRequest,
        order: &OrderSnapshot,
    ) -> Result<(), OrderError>;
}

/// Default policy: credit the consumer the full line total and restock the
/// returned quantity
pub struct FullLineRefund;

impl RefundPolicy for FullLineRefund {
    fn name(&self) -> &'static str {
        "full_line_refund"
    }

    fn on_completed(
        &self,
        txn: &WriteTransaction,
        request: &ReturnRequest,
        order: &OrderSnapshot,
    ) -> Result<(), OrderError> {
        let item = order.find_item(request.product_id).ok_or_else(|| {
            OrderError::InvalidOperation(format!(
                "order {} has no line for product {}",
                order.order_id, request.product_id
            ))
        })?;

        if item.line_total > 0.0 {
            wallet::credit(txn, request.consumer_id, item.line_total)?;
        }
        inventory::release(txn, request.product_id, item.quantity)?;

        tracing::info!(
            return_id = request.id,
            order_id = %request.order_id,
            refund = item.line_total,
            restocked = item.quantity,
            "Return refund applied"
        );
        Ok(())
    }
}

/// No automatic compensation; settlement happens out-of-band
pub struct NoCompensation;

impl RefundPolicy for NoCompensation {
    fn name(&self) -> &'static str {
        "no_compensation"
    }

    fn on_completed(
        &self,
        _txn: &WriteTransaction,
        _request: &ReturnRequest,
        _order: &OrderSnapshot,
    ) -> Result<(), OrderError> {
        Ok(())
    }
}
