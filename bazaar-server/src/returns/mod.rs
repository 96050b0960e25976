//! Return/Refund Workflow
//!
//! Secondary state machine attached to a delivered order item:
//! PENDING → {APPROVED, REJECTED}, APPROVED → COMPLETED (admin only).
//! An order item can have at most one active (PENDING/APPROVED) request,
//! enforced by an index table. Completion runs the configured
//! [`RefundPolicy`] inside the same transaction as the status change.

pub mod policy;

pub use policy::{FullLineRefund, NoCompensation, RefundPolicy};

use crate::storage::{
    ACTIVE_RETURNS_TABLE, RETURN_ID_COUNTER, RETURN_REQUESTS_TABLE, Storage, StorageError,
};
use crate::utils::now_millis;
use redb::{ReadableTable, WriteTransaction};
use shared::error::ErrorCode;
use shared::models::{Actor, ReturnRequest, ReturnRequestCreate, ReturnStatus, Role};
use shared::{AppError, AppResult};
use std::sync::Arc;
use tracing::info;

/// Return workflow service
#[derive(Clone)]
pub struct ReturnService {
    storage: Storage,
    policy: Arc<dyn RefundPolicy>,
}

impl ReturnService {
    pub fn new(storage: Storage, policy: Arc<dyn RefundPolicy>) -> Self {
        Self { storage, policy }
    }

    /// Create a return request against a delivered order item
    pub fn create_request(
        &self,
        actor: &Actor,
        payload: ReturnRequestCreate,
    ) -> AppResult<ReturnRequest> {
        if payload.reason.trim().is_empty() {
            return Err(AppError::validation("return reason must not be empty"));
        }

        let txn = self.storage.begin_write()?;

        let order = self
            .storage
            .get_snapshot_txn(&txn, &payload.order_id)?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order not found: {}", payload.order_id),
                )
            })?;

        // The owning consumer files returns; admins may file on their behalf
        match actor.role {
            Role::Admin => {}
            Role::Consumer if order.consumer_id == actor.id => {}
            _ => {
                return Err(AppError::permission_denied(format!(
                    "account {} cannot file a return for order {}",
                    actor.id, payload.order_id
                )));
            }
        }

        if !order.status.is_received() {
            return Err(AppError::with_message(
                ErrorCode::ReturnNotEligible,
                format!(
                    "order {} is {}, only delivered items can be returned",
                    payload.order_id, order.status
                ),
            ));
        }

        let item = order.find_item(payload.product_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ProductNotFound,
                format!(
                    "order {} has no line for product {}",
                    payload.order_id, payload.product_id
                ),
            )
        })?;

        // One active request per order item
        {
            let active = txn
                .open_table(ACTIVE_RETURNS_TABLE)
                .map_err(|e| AppError::database(e.to_string()))?;
            if active
                .get((payload.order_id.as_str(), payload.product_id))
                .map_err(|e| AppError::database(e.to_string()))?
                .is_some()
            {
                return Err(AppError::with_message(
                    ErrorCode::DuplicateActiveReturn,
                    format!(
                        "an active return already exists for order {} product {}",
                        payload.order_id, payload.product_id
                    ),
                ));
            }
        }

        let id = self.storage.next_id(&txn, RETURN_ID_COUNTER)?;
        let request = ReturnRequest {
            id,
            order_id: payload.order_id,
            product_id: payload.product_id,
            consumer_id: order.consumer_id,
            supplier_id: item.supplier_id,
            quantity: item.quantity,
            reason: payload.reason,
            resolution: None,
            status: ReturnStatus::Pending,
            requested_at: now_millis(),
            processed_at: None,
        };

        store_request(&txn, &request)?;
        {
            let mut active = txn
                .open_table(ACTIVE_RETURNS_TABLE)
                .map_err(|e| AppError::database(e.to_string()))?;
            active
                .insert((request.order_id.as_str(), request.product_id), id)
                .map_err(|e| AppError::database(e.to_string()))?;
        }
        txn.commit().map_err(StorageError::from)?;

        info!(
            return_id = id,
            order_id = %request.order_id,
            product_id = request.product_id,
            "Return request created"
        );
        Ok(request)
    }

    /// Process a return request: approve, reject, or complete
    ///
    /// Suppliers may only act on requests for their own products and may
    /// never set COMPLETED; admins may perform any valid transition.
    pub fn process_request(
        &self,
        actor: &Actor,
        request_id: u64,
        new_status: ReturnStatus,
        resolution: Option<String>,
    ) -> AppResult<ReturnRequest> {
        let txn = self.storage.begin_write()?;

        let mut request = get_request_txn(&txn, request_id)?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ReturnNotFound,
                format!("Return request not found: {}", request_id),
            )
        })?;

        // Role gate before transition check so a supplier probing a foreign
        // request learns nothing about its state
        match actor.role {
            Role::Admin => {}
            Role::Supplier => {
                if request.supplier_id != actor.id {
                    return Err(AppError::permission_denied(format!(
                        "supplier {} does not own the product of return {}",
                        actor.id, request_id
                    )));
                }
                if new_status == ReturnStatus::Completed {
                    return Err(AppError::permission_denied(
                        "suppliers cannot complete returns",
                    ));
                }
            }
            Role::Consumer => {
                return Err(AppError::permission_denied(
                    "consumers cannot process returns",
                ));
            }
        }

        let valid = matches!(
            (request.status, new_status),
            (ReturnStatus::Pending, ReturnStatus::Approved)
                | (ReturnStatus::Pending, ReturnStatus::Rejected)
                | (ReturnStatus::Approved, ReturnStatus::Completed)
        );
        if !valid {
            if request.status.is_terminal() {
                return Err(AppError::with_message(
                    ErrorCode::ReturnAlreadyResolved,
                    format!("return {} is already {:?}", request_id, request.status),
                ));
            }
            return Err(AppError::with_message(
                ErrorCode::InvalidStateTransition,
                format!(
                    "return {} cannot go {:?} -> {:?}",
                    request_id, request.status, new_status
                ),
            ));
        }

        request.status = new_status;
        request.resolution = resolution;
        request.processed_at = Some(now_millis());

        // Compensating wallet/stock effects, same transaction
        if new_status == ReturnStatus::Completed {
            let order = self
                .storage
                .get_snapshot_txn(&txn, &request.order_id)?
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::OrderNotFound,
                        format!("Order not found: {}", request.order_id),
                    )
                })?;
            self.policy
                .on_completed(&txn, &request, &order)
                .map_err(AppError::from)?;
        }

        store_request(&txn, &request)?;
        if !request.status.is_active() {
            let mut active = txn
                .open_table(ACTIVE_RETURNS_TABLE)
                .map_err(|e| AppError::database(e.to_string()))?;
            active
                .remove((request.order_id.as_str(), request.product_id))
                .map_err(|e| AppError::database(e.to_string()))?;
        }
        txn.commit().map_err(StorageError::from)?;

        info!(
            return_id = request_id,
            status = ?request.status,
            policy = self.policy.name(),
            "Return request processed"
        );
        Ok(request)
    }

    /// Get a return request by id
    pub fn get_request(&self, request_id: u64) -> AppResult<ReturnRequest> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn
            .open_table(RETURN_REQUESTS_TABLE)
            .map_err(|e| AppError::database(e.to_string()))?;
        let guard = table
            .get(request_id)
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ReturnNotFound,
                    format!("Return request not found: {}", request_id),
                )
            })?;
        serde_json::from_slice(guard.value()).map_err(|e| AppError::database(e.to_string()))
    }
}

fn store_request(txn: &WriteTransaction, request: &ReturnRequest) -> AppResult<()> {
    let mut table = txn
        .open_table(RETURN_REQUESTS_TABLE)
        .map_err(|e| AppError::database(e.to_string()))?;
    let bytes = serde_json::to_vec(request).map_err(|e| AppError::database(e.to_string()))?;
    table
        .insert(request.id, bytes.as_slice())
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(())
}

fn get_request_txn(txn: &WriteTransaction, request_id: u64) -> AppResult<Option<ReturnRequest>> {
    let table = txn
        .open_table(RETURN_REQUESTS_TABLE)
        .map_err(|e| AppError::database(e.to_string()))?;
    match table
        .get(request_id)
        .map_err(|e| AppError::database(e.to_string()))?
    {
        Some(guard) => Ok(Some(
            serde_json::from_slice(guard.value()).map_err(|e| AppError::database(e.to_string()))?,
        )),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{inventory, wallet};
    use shared::models::{Account, Product, ProductStatus};
    use shared::order::{OrderItemSnapshot, OrderSnapshot, OrderStatus};

    fn consumer(id: u64) -> Actor {
        Actor::new(id, "Consumer", Role::Consumer)
    }

    fn supplier(id: u64) -> Actor {
        Actor::new(id, "Supplier", Role::Supplier)
    }

    fn admin() -> Actor {
        Actor::new(99, "Admin", Role::Admin)
    }

    /// Storage with a delivered order (consumer 1, product 10 from supplier
    /// 50, qty 2 at 25.0) plus the product and consumer rows
    fn delivered_world() -> (Storage, ReturnService) {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();

        inventory::put(
            &txn,
            &Product {
                id: 10,
                name: "Widget".to_string(),
                supplier_id: 50,
                price: 25.0,
                stock: 0,
                sales: 2,
                status: ProductStatus::OnSale,
                created_at: 0,
                updated_at: 0,
            },
        )
        .unwrap();
        wallet::put(
            &txn,
            &Account {
                id: 1,
                name: "Consumer".to_string(),
                role: Role::Consumer,
                balance: 0.0,
                is_active: true,
                created_at: 0,
                updated_at: 0,
            },
        )
        .unwrap();

        let mut order = OrderSnapshot::new("order-1".to_string());
        order.consumer_id = 1;
        order.status = OrderStatus::Delivered;
        order.items = vec![OrderItemSnapshot {
            product_id: 10,
            name: "Widget".to_string(),
            supplier_id: 50,
            unit_price: 25.0,
            quantity: 2,
            line_total: 50.0,
        }];
        order.total_amount = 50.0;
        order.total_quantity = 2;
        storage.store_snapshot(&txn, &order).unwrap();
        txn.commit().unwrap();

        let service = ReturnService::new(storage.clone(), Arc::new(FullLineRefund));
        (storage, service)
    }

    fn create_payload() -> ReturnRequestCreate {
        ReturnRequestCreate {
            order_id: "order-1".to_string(),
            product_id: 10,
            reason: "damaged in transit".to_string(),
        }
    }

    #[test]
    fn test_create_request_on_delivered_order() {
        let (_, service) = delivered_world();
        let request = service.create_request(&consumer(1), create_payload()).unwrap();

        assert_eq!(request.status, ReturnStatus::Pending);
        assert_eq!(request.supplier_id, 50);
        assert_eq!(request.quantity, 2);
    }

    #[test]
    fn test_create_request_requires_delivered_status() {
        let (storage, service) = delivered_world();
        let txn = storage.begin_write().unwrap();
        let mut order = storage.get_snapshot_txn(&txn, "order-1").unwrap().unwrap();
        order.status = OrderStatus::Shipping;
        storage.store_snapshot(&txn, &order).unwrap();
        txn.commit().unwrap();

        let err = service
            .create_request(&consumer(1), create_payload())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReturnNotEligible);
    }

    #[test]
    fn test_duplicate_active_return_rejected() {
        let (_, service) = delivered_world();
        service.create_request(&consumer(1), create_payload()).unwrap();

        let err = service
            .create_request(&consumer(1), create_payload())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateActiveReturn);
    }

    #[test]
    fn test_rejected_request_unblocks_new_one() {
        let (_, service) = delivered_world();
        let request = service.create_request(&consumer(1), create_payload()).unwrap();

        service
            .process_request(&admin(), request.id, ReturnStatus::Rejected, None)
            .unwrap();

        // Terminal state clears the active index
        assert!(service.create_request(&consumer(1), create_payload()).is_ok());
    }

    #[test]
    fn test_foreign_consumer_cannot_file() {
        let (_, service) = delivered_world();
        let err = service
            .create_request(&consumer(2), create_payload())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_supplier_approves_own_request() {
        let (_, service) = delivered_world();
        let request = service.create_request(&consumer(1), create_payload()).unwrap();

        let processed = service
            .process_request(
                &supplier(50),
                request.id,
                ReturnStatus::Approved,
                Some("accepted".to_string()),
            )
            .unwrap();
        assert_eq!(processed.status, ReturnStatus::Approved);
        assert!(processed.processed_at.is_some());
    }

    #[test]
    fn test_foreign_supplier_cannot_process() {
        let (_, service) = delivered_world();
        let request = service.create_request(&consumer(1), create_payload()).unwrap();

        let err = service
            .process_request(&supplier(60), request.id, ReturnStatus::Approved, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_supplier_cannot_complete() {
        let (_, service) = delivered_world();
        let request = service.create_request(&consumer(1), create_payload()).unwrap();
        service
            .process_request(&supplier(50), request.id, ReturnStatus::Approved, None)
            .unwrap();

        let err = service
            .process_request(&supplier(50), request.id, ReturnStatus::Completed, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
    }

    #[test]
    fn test_completion_refunds_and_restocks() {
        let (storage, service) = delivered_world();
        let request = service.create_request(&consumer(1), create_payload()).unwrap();
        service
            .process_request(&admin(), request.id, ReturnStatus::Approved, None)
            .unwrap();
        service
            .process_request(
                &admin(),
                request.id,
                ReturnStatus::Completed,
                Some("refunded".to_string()),
            )
            .unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(wallet::get(&txn, 1).unwrap().balance, 50.0);
        assert_eq!(inventory::get(&txn, 10).unwrap().stock, 2);
    }

    #[test]
    fn test_complete_from_pending_fails() {
        let (_, service) = delivered_world();
        let request = service.create_request(&consumer(1), create_payload()).unwrap();

        let err = service
            .process_request(&admin(), request.id, ReturnStatus::Completed, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn test_terminal_request_cannot_be_reprocessed() {
        let (_, service) = delivered_world();
        let request = service.create_request(&consumer(1), create_payload()).unwrap();
        service
            .process_request(&admin(), request.id, ReturnStatus::Rejected, None)
            .unwrap();

        let err = service
            .process_request(&admin(), request.id, ReturnStatus::Approved, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ReturnAlreadyResolved);
    }

    #[test]
    fn test_no_compensation_policy_skips_ledgers() {
        let (storage, _) = delivered_world();
        let service = ReturnService::new(storage.clone(), Arc::new(NoCompensation));
        let request = service.create_request(&consumer(1), create_payload()).unwrap();
        service
            .process_request(&admin(), request.id, ReturnStatus::Approved, None)
            .unwrap();
        service
            .process_request(&admin(), request.id, ReturnStatus::Completed, None)
            .unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(wallet::get(&txn, 1).unwrap().balance, 0.0);
        assert_eq!(inventory::get(&txn, 10).unwrap().stock, 0);
    }
}
