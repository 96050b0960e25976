//! Order commands - requests from callers to drive the state machine

use super::types::OrderItemInput;
use crate::models::account::Role;
use serde::{Deserialize, Serialize};

/// Order command with caller identity
///
/// Every command carries the acting caller (id + role) for authorization;
/// role gates live in the actions, not in HTTP glue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCommand {
    /// Unique command ID (for idempotency)
    pub command_id: String,
    /// Acting account
    pub actor_id: u64,
    /// Actor name (snapshot for audit)
    pub actor_name: String,
    /// Actor role (authorization)
    pub actor_role: Role,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Command payload
    pub payload: OrderCommandPayload,
}

impl OrderCommand {
    /// Create a new command with a generated command ID and current timestamp
    pub fn new(
        actor_id: u64,
        actor_name: String,
        actor_role: Role,
        payload: OrderCommandPayload,
    ) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            actor_id,
            actor_name,
            actor_role,
            timestamp: chrono::Utc::now().timestamp_millis(),
            payload,
        }
    }
}

/// Command payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCommandPayload {
    /// Create an order from the given items (consumer)
    CreateOrder { items: Vec<OrderItemInput> },

    /// Cancel an unpaid order, releasing reserved stock (consumer/admin)
    CancelOrder { order_id: String },

    /// Pay an order from the consumer's wallet (consumer)
    PayOrder { order_id: String, method: String },

    /// Ship a paid order (admin, or supplier for own items)
    ShipOrder { order_id: String },

    /// Mark a shipped order as in transit (admin/supplier)
    MarkInTransit { order_id: String },

    /// Mark an order as delivered (admin/supplier)
    DeliverOrder { order_id: String },

    /// Confirm receipt of a shipped order (consumer)
    ConfirmReceipt { order_id: String },

    /// Approve supplier payout for a delivered order (admin)
    ApprovePayout { order_id: String },

    /// Administrative reversal before shipment (admin)
    RevokeOrder {
        order_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl OrderCommandPayload {
    /// The order targeted by this command, if it targets an existing order
    pub fn order_id(&self) -> Option<&str> {
        match self {
            OrderCommandPayload::CreateOrder { .. } => None,
            OrderCommandPayload::CancelOrder { order_id }
            | OrderCommandPayload::PayOrder { order_id, .. }
            | OrderCommandPayload::ShipOrder { order_id }
            | OrderCommandPayload::MarkInTransit { order_id }
            | OrderCommandPayload::DeliverOrder { order_id }
            | OrderCommandPayload::ConfirmReceipt { order_id }
            | OrderCommandPayload::ApprovePayout { order_id }
            | OrderCommandPayload::RevokeOrder { order_id, .. } => Some(order_id),
        }
    }
}
