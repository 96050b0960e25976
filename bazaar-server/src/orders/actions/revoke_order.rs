//! RevokeOrder command handler
//!
//! Administrative reversal, symmetric to cancellation: releases reserved
//! stock and, when the order was already paid, refunds the consumer's
//! wallet. Only allowed before shipment; later states have had goods
//! movement or settlement and must go through the return workflow instead.

use async_trait::async_trait;
use tracing::info;

use crate::orders::traits::{
    CommandContext, CommandHandler, CommandMetadata, OrderError, require_transition,
};
use shared::models::Role;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus, StockMovement};

/// RevokeOrder action
#[derive(Debug, Clone)]
pub struct RevokeOrderAction {
    pub order_id: String,
    pub reason: Option<String>,
}

#[async_trait]
impl CommandHandler for RevokeOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        if metadata.actor_role != Role::Admin {
            return Err(OrderError::Unauthorized(
                "only admins can revoke orders".to_string(),
            ));
        }

        let snapshot = ctx.load_snapshot(&self.order_id)?;

        require_transition(
            snapshot.status,
            OrderStatus::Revoked,
            &[OrderStatus::PendingPayment, OrderStatus::PendingShipment],
        )?;

        // Release every reserved line
        let mut released = Vec::with_capacity(snapshot.items.len());
        for item in &snapshot.items {
            ctx.release_stock(item.product_id, item.quantity)?;
            released.push(StockMovement {
                product_id: item.product_id,
                quantity: item.quantity,
            });
        }

        // Reverse the wallet debit when payment already happened
        let refund_amount = if snapshot.status == OrderStatus::PendingShipment {
            if snapshot.total_amount > 0.0 {
                ctx.credit_wallet(snapshot.consumer_id, snapshot.total_amount)?;
            }
            Some(snapshot.total_amount)
        } else {
            None
        };

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.actor_id,
            metadata.actor_name.clone(),
            metadata.actor_role,
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderRevoked,
            EventPayload::OrderRevoked {
                reason: self.reason.clone(),
                refund_amount,
                released,
            },
        );

        info!(
            order_id = %self.order_id,
            refund_amount = ?refund_amount,
            "Order revoked"
        );
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use crate::{inventory, wallet};
    use shared::models::{Account, Product, ProductStatus};
    use shared::order::{OrderItemSnapshot, OrderSnapshot};

    fn create_test_metadata(role: Role) -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: 99,
            actor_name: "Admin".to_string(),
            actor_role: role,
            timestamp: 1234567890,
        }
    }

    fn seed_world(txn: &redb::WriteTransaction, stock: i64, consumer_balance: f64) {
        inventory::put(
            txn,
            &Product {
                id: 10,
                name: "Product 10".to_string(),
                supplier_id: 50,
                price: 25.0,
                stock,
                sales: 0,
                status: ProductStatus::OnSale,
                created_at: 0,
                updated_at: 0,
            },
        )
        .unwrap();
        wallet::put(
            txn,
            &Account {
                id: 1,
                name: "Consumer 1".to_string(),
                role: Role::Consumer,
                balance: consumer_balance,
                is_active: true,
                created_at: 0,
                updated_at: 0,
            },
        )
        .unwrap();
    }

    fn order_in(status: OrderStatus, order_id: &str) -> OrderSnapshot {
        let mut snapshot = OrderSnapshot::new(order_id.to_string());
        snapshot.consumer_id = 1;
        snapshot.status = status;
        snapshot.items = vec![OrderItemSnapshot {
            product_id: 10,
            name: "P".to_string(),
            supplier_id: 50,
            unit_price: 25.0,
            quantity: 2,
            line_total: 50.0,
        }];
        snapshot.total_amount = 50.0;
        snapshot.total_quantity = 2;
        snapshot
    }

    #[tokio::test]
    async fn test_revoke_unpaid_releases_stock_without_refund() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_world(&txn, 0, 100.0);
        storage
            .store_snapshot(&txn, &order_in(OrderStatus::PendingPayment, "order-1"))
            .unwrap();

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = RevokeOrderAction {
            order_id: "order-1".to_string(),
            reason: Some("fraud check".to_string()),
        };

        let events = action
            .execute(&mut ctx, &create_test_metadata(Role::Admin))
            .await
            .unwrap();

        assert_eq!(inventory::get(&txn, 10).unwrap().stock, 2);
        assert_eq!(wallet::get(&txn, 1).unwrap().balance, 100.0);

        let EventPayload::OrderRevoked { refund_amount, .. } = &events[0].payload else {
            panic!("Expected OrderRevoked payload");
        };
        assert_eq!(*refund_amount, None);
    }

    #[tokio::test]
    async fn test_revoke_paid_refunds_consumer() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_world(&txn, 0, 100.0);
        storage
            .store_snapshot(&txn, &order_in(OrderStatus::PendingShipment, "order-1"))
            .unwrap();

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = RevokeOrderAction {
            order_id: "order-1".to_string(),
            reason: None,
        };

        let events = action
            .execute(&mut ctx, &create_test_metadata(Role::Admin))
            .await
            .unwrap();

        assert_eq!(inventory::get(&txn, 10).unwrap().stock, 2);
        assert_eq!(wallet::get(&txn, 1).unwrap().balance, 150.0);

        let EventPayload::OrderRevoked { refund_amount, .. } = &events[0].payload else {
            panic!("Expected OrderRevoked payload");
        };
        assert_eq!(*refund_amount, Some(50.0));
    }

    #[tokio::test]
    async fn test_revoke_shipped_order_fails() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_world(&txn, 0, 100.0);
        storage
            .store_snapshot(&txn, &order_in(OrderStatus::Shipping, "order-1"))
            .unwrap();

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = RevokeOrderAction {
            order_id: "order-1".to_string(),
            reason: None,
        };

        let result = action
            .execute(&mut ctx, &create_test_metadata(Role::Admin))
            .await;
        assert!(matches!(
            result,
            Err(OrderError::InvalidStateTransition {
                current: OrderStatus::Shipping,
                attempted: OrderStatus::Revoked,
            })
        ));
    }

    #[tokio::test]
    async fn test_revoke_requires_admin() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_world(&txn, 0, 100.0);
        storage
            .store_snapshot(&txn, &order_in(OrderStatus::PendingPayment, "order-1"))
            .unwrap();

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = RevokeOrderAction {
            order_id: "order-1".to_string(),
            reason: None,
        };

        let result = action
            .execute(&mut ctx, &create_test_metadata(Role::Consumer))
            .await;
        assert!(matches!(result, Err(OrderError::Unauthorized(_))));
    }
}
