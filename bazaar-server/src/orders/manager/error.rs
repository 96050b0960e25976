//! Manager error types and error-code classification

use crate::orders::traits::OrderError;
use crate::storage::StorageError;
use shared::order::{CommandError, CommandErrorCode};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Classify a storage error into an error code (frontend handles localization)
fn classify_storage_error(e: &StorageError) -> CommandErrorCode {
    // Exact matches on enum variants first
    match e {
        StorageError::Serialization(_) => return CommandErrorCode::InternalError,
        StorageError::OrderNotFound(_) => return CommandErrorCode::OrderNotFound,
        _ => {}
    }

    // redb errors are classified by string matching
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return CommandErrorCode::StorageFull;
    }

    if err_str.contains("out of memory") || err_str.contains("cannot allocate") {
        return CommandErrorCode::OutOfMemory;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return CommandErrorCode::StorageCorrupted;
    }

    // Default: system busy (redb Database/Transaction/Table/Storage/Commit errors)
    CommandErrorCode::SystemBusy
}

/// Classify an action error into an error code
fn classify_order_error(e: &OrderError) -> CommandErrorCode {
    match e {
        OrderError::OrderNotFound(_) => CommandErrorCode::OrderNotFound,
        OrderError::ProductNotFound(_) => CommandErrorCode::ProductNotFound,
        OrderError::ProductUnavailable(_) => CommandErrorCode::ProductUnavailable,
        OrderError::InsufficientStock { .. } => CommandErrorCode::InsufficientStock,
        OrderError::AccountNotFound(_) => CommandErrorCode::AccountNotFound,
        OrderError::InsufficientFunds { .. } => CommandErrorCode::InsufficientFunds,
        OrderError::InvalidStateTransition { .. } => CommandErrorCode::InvalidStateTransition,
        OrderError::Unauthorized(_) => CommandErrorCode::Unauthorized,
        OrderError::EmptyOrder => CommandErrorCode::EmptyOrder,
        OrderError::InvalidQuantity(_) => CommandErrorCode::InvalidQuantity,
        OrderError::InvalidAmount => CommandErrorCode::InvalidAmount,
        OrderError::InvalidOperation(_) => CommandErrorCode::InvalidOperation,
        OrderError::Storage(_) => CommandErrorCode::SystemBusy,
    }
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let (code, message) = match &err {
            ManagerError::Storage(e) => {
                let code = classify_storage_error(e);
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                (code, e.to_string())
            }
            ManagerError::Order(e) => (classify_order_error(e), e.to_string()),
            ManagerError::Internal(msg) => (CommandErrorCode::InternalError, msg.clone()),
        };
        CommandError::new(code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::OrderStatus;

    #[test]
    fn test_order_error_classification() {
        let err = ManagerError::Order(OrderError::InsufficientStock {
            product_id: 1,
            requested: 5,
            available: 2,
        });
        let cmd_err: CommandError = err.into();
        assert_eq!(cmd_err.code, CommandErrorCode::InsufficientStock);
        assert!(cmd_err.message.contains("product 1"));
    }

    #[test]
    fn test_state_transition_error_carries_both_states() {
        let err = ManagerError::Order(OrderError::InvalidStateTransition {
            current: OrderStatus::Delivered,
            attempted: OrderStatus::PendingPayment,
        });
        let cmd_err: CommandError = err.into();
        assert_eq!(cmd_err.code, CommandErrorCode::InvalidStateTransition);
        assert!(cmd_err.message.contains("DELIVERED"));
        assert!(cmd_err.message.contains("PENDING_PAYMENT"));
    }

    #[test]
    fn test_internal_error_classification() {
        let err = ManagerError::Internal("boom".to_string());
        let cmd_err: CommandError = err.into();
        assert_eq!(cmd_err.code, CommandErrorCode::InternalError);
    }
}
