//! Product Model
//!
//! Stock and sales counters are only mutated through the inventory ledger
//! primitives (reserve/release/record_sales/adjust_stock); `ProductUpdate`
//! deliberately has no stock field.

use serde::{Deserialize, Serialize};

/// Product sale status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    OnSale,
    OffSale,
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    /// Owning supplier account
    pub supplier_id: u64,
    /// Current list price (snapshotted into orders at purchase time)
    pub price: f64,
    /// Units available; never negative
    pub stock: i64,
    /// Units delivered to consumers; only increases
    pub sales: i64,
    pub status: ProductStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    pub fn is_on_sale(&self) -> bool {
        self.status == ProductStatus::OnSale
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub supplier_id: u64,
    pub price: f64,
    pub stock: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialize() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::OnSale).unwrap(),
            "\"ON_SALE\""
        );
        assert_eq!(
            serde_json::to_string(&ProductStatus::OffSale).unwrap(),
            "\"OFF_SALE\""
        );
    }

    #[test]
    fn test_is_on_sale() {
        let product = Product {
            id: 1,
            name: "Widget".to_string(),
            supplier_id: 7,
            price: 19.99,
            stock: 10,
            sales: 0,
            status: ProductStatus::OnSale,
            created_at: 0,
            updated_at: 0,
        };
        assert!(product.is_on_sale());
    }
}
