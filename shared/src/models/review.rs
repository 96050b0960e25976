//! Product Review Model

use super::account::Role;
use serde::{Deserialize, Serialize};

/// Product review entity
///
/// At most one review exists per (order item, author role); the author role
/// tag lets a consumer review and a staff review coexist on the same item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductReview {
    pub id: u64,
    pub order_id: String,
    /// Order item reference (product within the order)
    pub product_id: u64,
    pub author_id: u64,
    pub author_role: Role,
    /// Rating, 1 to 5
    pub rating: u8,
    pub comment: String,
    pub created_at: i64,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub order_id: String,
    pub product_id: u64,
    pub rating: u8,
    pub comment: String,
}
