//! Return Request Model

use serde::{Deserialize, Serialize};

/// Return request status
///
/// PENDING → APPROVED | REJECTED, APPROVED → COMPLETED.
/// REJECTED and COMPLETED are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl ReturnStatus {
    /// An active request blocks new requests for the same order item
    pub fn is_active(&self) -> bool {
        matches!(self, ReturnStatus::Pending | ReturnStatus::Approved)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReturnStatus::Rejected | ReturnStatus::Completed)
    }
}

/// Return request entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnRequest {
    pub id: u64,
    /// Order the returned item belongs to
    pub order_id: String,
    /// Order item reference (product within the order)
    pub product_id: u64,
    pub consumer_id: u64,
    /// Supplier owning the product (snapshot for role gating)
    pub supplier_id: u64,
    /// Quantity covered by this request (the full order line)
    pub quantity: i32,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    pub status: ReturnStatus,
    pub requested_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<i64>,
}

/// Create return request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequestCreate {
    pub order_id: String,
    pub product_id: u64,
    pub reason: String,
}
