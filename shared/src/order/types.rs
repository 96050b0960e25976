//! Shared types for the order lifecycle engine

use serde::{Deserialize, Serialize};

// ============================================================================
// Order Item Types
// ============================================================================

/// Order item input - what a caller submits when creating an order
///
/// Prices are never client-supplied; the engine snapshots the catalog price
/// at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItemInput {
    pub product_id: u64,
    pub quantity: i32,
}

/// Order item snapshot - the immutable line recorded on the order
///
/// `unit_price` is the catalog price at purchase time and never changes
/// afterwards, even if the live product price does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemSnapshot {
    pub product_id: u64,
    /// Product name snapshot (for display/audit)
    pub name: String,
    /// Supplier owning the product (snapshot for shipment/payout gating)
    pub supplier_id: u64,
    /// Unit price at purchase time
    pub unit_price: f64,
    pub quantity: i32,
    /// unit_price × quantity, rounded to 2 decimal places
    pub line_total: f64,
}

/// Stock movement record (released units on cancel/revoke)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockMovement {
    pub product_id: u64,
    pub quantity: i32,
}

/// Per-supplier payout line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierPayout {
    pub supplier_id: u64,
    /// Supplier's item totals minus commission
    pub amount: f64,
}

// ============================================================================
// Command Response Types
// ============================================================================

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// New order ID (only for CreateOrder command)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, order_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            order_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            order_id: None,
            error: Some(error),
        }
    }

    pub fn duplicate(command_id: String) -> Self {
        Self {
            command_id,
            success: true,
            order_id: None,
            error: None,
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    OrderNotFound,
    ProductNotFound,
    AccountNotFound,
    ProductUnavailable,
    InsufficientStock,
    InsufficientFunds,
    InvalidStateTransition,
    Unauthorized,
    EmptyOrder,
    InvalidQuantity,
    InvalidAmount,
    InvalidOperation,
    DuplicateCommand,
    InternalError,
    // Storage errors (maps to ErrorCode 94xx)
    StorageFull,
    OutOfMemory,
    StorageCorrupted,
    SystemBusy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_response_success() {
        let resp = CommandResponse::success("cmd-1".to_string(), Some("order-1".to_string()));
        assert!(resp.success);
        assert_eq!(resp.order_id.as_deref(), Some("order-1"));
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_command_response_error() {
        let resp = CommandResponse::error(
            "cmd-1".to_string(),
            CommandError::new(CommandErrorCode::InsufficientStock, "only 2 left"),
        );
        assert!(!resp.success);
        assert_eq!(
            resp.error.unwrap().code,
            CommandErrorCode::InsufficientStock
        );
    }

    #[test]
    fn test_error_code_serialize() {
        let json = serde_json::to_string(&CommandErrorCode::InvalidStateTransition).unwrap();
        assert_eq!(json, "\"INVALID_STATE_TRANSITION\"");
    }
}
