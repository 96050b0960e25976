//! Order events - immutable facts recorded after command processing

use super::types::{OrderItemSnapshot, StockMovement, SupplierPayout};
use crate::models::account::Role;
use serde::{Deserialize, Serialize};

/// Order event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (for ordering and replay)
    /// This is the AUTHORITATIVE ordering mechanism for state evolution
    pub sequence: u64,
    /// Order this event belongs to
    pub order_id: String,
    /// Server timestamp (Unix milliseconds) - AUTHORITATIVE for state evolution
    pub timestamp: i64,
    /// Client timestamp (Unix milliseconds) - for audit and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    /// Account that triggered this event
    pub actor_id: u64,
    /// Actor name (snapshot for audit)
    pub actor_name: String,
    /// Actor role at the time of the event
    pub actor_role: Role,
    /// Command that triggered this event (for audit tracing)
    pub command_id: String,
    /// Event type
    pub event_type: OrderEventType,
    /// Event payload
    pub payload: EventPayload,
}

impl OrderEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        order_id: String,
        actor_id: u64,
        actor_name: String,
        actor_role: Role,
        command_id: String,
        client_timestamp: Option<i64>,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
            client_timestamp,
            actor_id,
            actor_name,
            actor_role,
            command_id,
            event_type,
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderCreated,
    OrderCancelled,
    OrderPaid,
    OrderShipped,
    OrderInTransit,
    OrderDelivered,
    PayoutApproved,
    OrderRevoked,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderCreated => write!(f, "ORDER_CREATED"),
            OrderEventType::OrderCancelled => write!(f, "ORDER_CANCELLED"),
            OrderEventType::OrderPaid => write!(f, "ORDER_PAID"),
            OrderEventType::OrderShipped => write!(f, "ORDER_SHIPPED"),
            OrderEventType::OrderInTransit => write!(f, "ORDER_IN_TRANSIT"),
            OrderEventType::OrderDelivered => write!(f, "ORDER_DELIVERED"),
            OrderEventType::PayoutApproved => write!(f, "PAYOUT_APPROVED"),
            OrderEventType::OrderRevoked => write!(f, "ORDER_REVOKED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    OrderCreated {
        /// Server-generated order number (always present)
        order_no: String,
        consumer_id: u64,
        /// Complete snapshots of the ordered items, ascending product ID
        items: Vec<OrderItemSnapshot>,
        total_amount: f64,
        total_quantity: i32,
    },

    OrderCancelled {
        /// Stock released back to inventory
        released: Vec<StockMovement>,
    },

    OrderPaid {
        method: String,
        amount: f64,
    },

    OrderShipped {
        /// Shipping supplier (absent when an admin ships)
        #[serde(skip_serializing_if = "Option::is_none")]
        supplier_id: Option<u64>,
    },

    OrderInTransit {},

    OrderDelivered {
        /// Whether the consumer confirmed receipt (vs. carrier/admin marking)
        confirmed_by_consumer: bool,
    },

    PayoutApproved {
        payouts: Vec<SupplierPayout>,
        /// Platform commission retained from the order total
        commission_amount: f64,
    },

    OrderRevoked {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        /// Amount refunded to the consumer (present when the order was paid)
        #[serde(skip_serializing_if = "Option::is_none")]
        refund_amount: Option<f64>,
        /// Stock released back to inventory
        released: Vec<StockMovement>,
    },
}
