//! Order snapshot - computed state from the event stream
//!
//! The snapshot includes a `state_checksum` field for drift detection.
//! Clients can compare their locally computed checksum with the server's
//! to detect if their applied state has diverged.

use super::types::{OrderItemSnapshot, SupplierPayout};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Order lifecycle status
///
/// Forward path: PENDING_PAYMENT → PENDING_SHIPMENT → SHIPPING →
/// (IN_TRANSIT →) DELIVERED. Side exits: CANCELLED (unpaid only) and
/// REVOKED (administrative, pre-shipment). Payout approval does not change
/// the status; it sets the payout fields on a DELIVERED order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum OrderStatus {
    #[default]
    PendingPayment = 0,
    PendingShipment = 1,
    Shipping = 2,
    InTransit = 3,
    Delivered = 4,
    Cancelled = 5,
    Revoked = 6,
}

impl OrderStatus {
    /// Terminal states accept no further lifecycle commands
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Revoked)
    }

    /// States in which the consumer has possession of the goods
    pub fn is_received(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::PendingPayment => "PENDING_PAYMENT",
            OrderStatus::PendingShipment => "PENDING_SHIPMENT",
            OrderStatus::Shipping => "SHIPPING",
            OrderStatus::InTransit => "IN_TRANSIT",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Revoked => "REVOKED",
        };
        write!(f, "{}", s)
    }
}

/// Order snapshot - computed from the event stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    /// Order ID (assigned by server)
    pub order_id: String,
    /// Human-traceable order number (unique)
    pub order_no: String,
    /// Owning consumer account
    pub consumer_id: u64,
    /// Order status
    pub status: OrderStatus,
    /// Ordered items, ascending product ID
    pub items: Vec<OrderItemSnapshot>,
    /// Sum of line totals, fixed at creation time
    pub total_amount: f64,
    /// Sum of item quantities
    pub total_quantity: i32,
    /// Payment method (set on payment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    // === Transition timestamps (Unix millis) ===
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_transit_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
    /// Set when the consumer confirmed receipt themselves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<i64>,

    // === Payout bookkeeping ===
    #[serde(default)]
    pub payout_approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payouts: Option<Vec<SupplierPayout>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_at: Option<i64>,

    /// Last update timestamp
    pub updated_at: i64,
    /// Last applied event sequence (for incremental updates)
    pub last_sequence: u64,
    /// State checksum for drift detection (hex string)
    #[serde(default)]
    pub state_checksum: String,
}

impl OrderSnapshot {
    /// Create a new empty order in PENDING_PAYMENT
    pub fn new(order_id: String) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let mut snapshot = Self {
            order_id,
            order_no: String::new(),
            consumer_id: 0,
            status: OrderStatus::PendingPayment,
            items: Vec::new(),
            total_amount: 0.0,
            total_quantity: 0,
            payment_method: None,
            created_at: now,
            paid_at: None,
            shipped_at: None,
            in_transit_at: None,
            delivered_at: None,
            confirmed_at: None,
            cancelled_at: None,
            revoked_at: None,
            payout_approved: false,
            payouts: None,
            commission_amount: None,
            payout_at: None,
            updated_at: now,
            last_sequence: 0,
            state_checksum: String::new(),
        };
        snapshot.update_checksum();
        snapshot
    }

    /// Find an order line by product ID
    pub fn find_item(&self, product_id: u64) -> Option<&OrderItemSnapshot> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// All suppliers with items on this order
    pub fn supplier_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.items.iter().map(|i| i.supplier_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Whether every item on the order belongs to the given supplier
    pub fn all_items_from_supplier(&self, supplier_id: u64) -> bool {
        !self.items.is_empty() && self.items.iter().all(|i| i.supplier_id == supplier_id)
    }

    /// Whether any item on the order belongs to the given supplier
    pub fn has_supplier(&self, supplier_id: u64) -> bool {
        self.items.iter().any(|i| i.supplier_id == supplier_id)
    }

    /// Compute state checksum for drift detection
    ///
    /// The checksum is computed from key state fields that should match
    /// between server and client after applying the same events.
    /// Returns a 16-character hex string.
    pub fn compute_checksum(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher as _;

        let mut hasher = DefaultHasher::new();

        // Hash item count
        self.items.len().hash(&mut hasher);

        // Hash total in cents (avoid float precision issues)
        ((self.total_amount * 100.0).round() as i64).hash(&mut hasher);

        // Hash last sequence
        self.last_sequence.hash(&mut hasher);

        // Hash status discriminant
        (self.status as u8).hash(&mut hasher);

        // Hash payout flag
        self.payout_approved.hash(&mut hasher);

        format!("{:016x}", hasher.finish())
    }

    /// Update the state_checksum field based on current state
    pub fn update_checksum(&mut self) {
        self.state_checksum = self.compute_checksum();
    }

    /// Verify that the state_checksum matches the computed checksum
    /// Returns true if checksum matches, false if drift detected
    pub fn verify_checksum(&self) -> bool {
        self.state_checksum == self.compute_checksum()
    }
}

impl Default for OrderSnapshot {
    fn default() -> Self {
        Self::new(String::new())
    }
}
