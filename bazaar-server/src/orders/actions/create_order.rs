//! CreateOrder command handler
//!
//! Creates an order from a consumer's cart, snapshotting catalog prices and
//! reserving stock for every line. Reservations happen inside the command
//! transaction: if any line fails, the transaction is dropped and every
//! prior reservation rolls back with it.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;

use crate::orders::money;
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::models::Role;
use shared::order::{
    EventPayload, OrderEvent, OrderEventType, OrderItemInput, OrderItemSnapshot,
};

/// CreateOrder action
#[derive(Debug, Clone)]
pub struct CreateOrderAction {
    /// Server-generated order number (pre-reserved by the manager)
    pub order_no: String,
    pub items: Vec<OrderItemInput>,
}

#[async_trait]
impl CommandHandler for CreateOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Only consumers open orders for themselves
        if metadata.actor_role != Role::Consumer {
            return Err(OrderError::Unauthorized(
                "only consumers can create orders".to_string(),
            ));
        }

        // 2. Validate the cart shape before touching any ledger
        if self.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        for item in &self.items {
            money::validate_quantity(item.quantity)?;
        }

        // 3. Merge duplicate lines; BTreeMap keeps product ids ascending,
        //    which fixes the row-touch order for multi-item orders
        let mut quantities: BTreeMap<u64, i32> = BTreeMap::new();
        for item in &self.items {
            *quantities.entry(item.product_id).or_insert(0) += item.quantity;
        }
        for quantity in quantities.values() {
            money::validate_quantity(*quantity)?;
        }

        // 4. The consumer account must exist before money can ever move
        ctx.load_account(metadata.actor_id)?;

        // 5. Snapshot prices and reserve stock, line by line
        let mut items = Vec::with_capacity(quantities.len());
        for (&product_id, &quantity) in &quantities {
            let product = ctx.load_product(product_id)?;
            if !product.is_on_sale() {
                return Err(OrderError::ProductUnavailable(product_id));
            }
            ctx.reserve_stock(product_id, quantity)?;

            items.push(OrderItemSnapshot {
                product_id,
                name: product.name.clone(),
                supplier_id: product.supplier_id,
                unit_price: product.price,
                quantity,
                line_total: money::line_total(product.price, quantity),
            });
        }

        let (total_amount, total_quantity) = money::order_totals(&items);

        // 6. Generate new order ID and allocate sequence
        let order_id = Uuid::new_v4().to_string();
        let seq = ctx.next_sequence();

        // 7. Create snapshot (status defaults to PENDING_PAYMENT)
        let mut snapshot = ctx.create_snapshot(order_id.clone());
        snapshot.order_no = self.order_no.clone();
        snapshot.consumer_id = metadata.actor_id;
        snapshot.items = items.clone();
        snapshot.total_amount = total_amount;
        snapshot.total_quantity = total_quantity;
        snapshot.created_at = metadata.timestamp;
        snapshot.updated_at = metadata.timestamp;
        snapshot.last_sequence = seq;
        snapshot.update_checksum();
        ctx.save_snapshot(snapshot);

        // 8. Create event
        let event = OrderEvent::new(
            seq,
            order_id.clone(),
            metadata.actor_id,
            metadata.actor_name.clone(),
            metadata.actor_role,
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderCreated,
            EventPayload::OrderCreated {
                order_no: self.order_no.clone(),
                consumer_id: metadata.actor_id,
                items,
                total_amount,
                total_quantity,
            },
        );

        info!(
            order_id = %order_id,
            order_no = %self.order_no,
            total_amount,
            total_quantity,
            "Order created"
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

    fn create_test_metadata(role: Role) -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            actor_id: 1,
            actor_name: "Test Consumer".to_string(),
            actor_role: role,
            timestamp: 1234567890,
        }
    }

    fn seed_product(
        txn: &redb::WriteTransaction,
        id: u64,
        price: f64,
        stock: i64,
        status: ProductStatus,
    ) {
        let product = Product {
            id,
            name: format!("Product {}", id),
            supplier_id: 50,
            price,
            stock,
            sales: 0,
            status,
            created_at: 0,
            updated_at: 0,
        };
        inventory::put(txn, &product).unwrap();
    }

    fn seed_consumer(txn: &redb::WriteTransaction, id: u64) {
        let account = Account {
            id,
            name: format!("Consumer {}", id),
            role: Role::Consumer,
            balance: 1000.0,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        };
        wallet::put(txn, &account).unwrap();
    }

    fn item(product_id: u64, quantity: i32) -> OrderItemInput {
        OrderItemInput {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_create_order_success() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_consumer(&txn, 1);
        seed_product(&txn, 10, 19.99, 5, ProductStatus::OnSale);
        seed_product(&txn, 11, 5.0, 3, ProductStatus::OnSale);

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = CreateOrderAction {
            order_no: "ORD202601010001".to_string(),
            items: vec![item(11, 1), item(10, 2)],
        };

        let events = action
            .execute(&mut ctx, &create_test_metadata(Role::Consumer))
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, OrderEventType::OrderCreated);
        let EventPayload::OrderCreated {
            items,
            total_amount,
            total_quantity,
            ..
        } = &events[0].payload
        else {
            panic!("Expected OrderCreated payload");
        };

        // Items come out in ascending product id order
        assert_eq!(items[0].product_id, 10);
        assert_eq!(items[1].product_id, 11);
        assert_eq!(*total_amount, 44.98);
        assert_eq!(*total_quantity, 3);

        // Stock is reserved within the transaction
        assert_eq!(inventory::get(&txn, 10).unwrap().stock, 3);
        assert_eq!(inventory::get(&txn, 11).unwrap().stock, 2);
    }

    #[tokio::test]
    async fn test_create_order_merges_duplicate_lines() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_consumer(&txn, 1);
        seed_product(&txn, 10, 2.5, 10, ProductStatus::OnSale);

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = CreateOrderAction {
            order_no: "ORD202601010002".to_string(),
            items: vec![item(10, 2), item(10, 3)],
        };

        let events = action
            .execute(&mut ctx, &create_test_metadata(Role::Consumer))
            .await
            .unwrap();

        let EventPayload::OrderCreated { items, .. } = &events[0].payload else {
            panic!("Expected OrderCreated payload");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
        assert_eq!(items[0].line_total, 12.5);
        assert_eq!(inventory::get(&txn, 10).unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_create_order_snapshots_current_price() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_consumer(&txn, 1);
        seed_product(&txn, 10, 7.77, 5, ProductStatus::OnSale);

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = CreateOrderAction {
            order_no: "ORD202601010003".to_string(),
            items: vec![item(10, 1)],
        };

        let events = action
            .execute(&mut ctx, &create_test_metadata(Role::Consumer))
            .await
            .unwrap();

        let EventPayload::OrderCreated { items, .. } = &events[0].payload else {
            panic!("Expected OrderCreated payload");
        };
        assert_eq!(items[0].unit_price, 7.77);
    }

    #[tokio::test]
    async fn test_create_order_off_sale_product_fails() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_consumer(&txn, 1);
        seed_product(&txn, 10, 1.0, 5, ProductStatus::OffSale);

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = CreateOrderAction {
            order_no: "ORD202601010004".to_string(),
            items: vec![item(10, 1)],
        };

        let result = action
            .execute(&mut ctx, &create_test_metadata(Role::Consumer))
            .await;
        assert!(matches!(result, Err(OrderError::ProductUnavailable(10))));
    }

    #[tokio::test]
    async fn test_create_order_insufficient_stock_fails() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_consumer(&txn, 1);
        seed_product(&txn, 10, 1.0, 2, ProductStatus::OnSale);

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = CreateOrderAction {
            order_no: "ORD202601010005".to_string(),
            items: vec![item(10, 3)],
        };

        let result = action
            .execute(&mut ctx, &create_test_metadata(Role::Consumer))
            .await;
        assert!(matches!(
            result,
            Err(OrderError::InsufficientStock {
                product_id: 10,
                requested: 3,
                available: 2,
            })
        ));
    }

    #[tokio::test]
    async fn test_create_order_empty_cart_fails() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_consumer(&txn, 1);

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = CreateOrderAction {
            order_no: "ORD202601010006".to_string(),
            items: vec![],
        };

        let result = action
            .execute(&mut ctx, &create_test_metadata(Role::Consumer))
            .await;
        assert!(matches!(result, Err(OrderError::EmptyOrder)));
    }

    #[tokio::test]
    async fn test_create_order_zero_quantity_fails() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_consumer(&txn, 1);
        seed_product(&txn, 10, 1.0, 5, ProductStatus::OnSale);

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = CreateOrderAction {
            order_no: "ORD202601010007".to_string(),
            items: vec![item(10, 0)],
        };

        let result = action
            .execute(&mut ctx, &create_test_metadata(Role::Consumer))
            .await;
        assert!(matches!(result, Err(OrderError::InvalidQuantity(0))));
    }

    #[tokio::test]
    async fn test_create_order_requires_consumer_role() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_product(&txn, 10, 1.0, 5, ProductStatus::OnSale);

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = CreateOrderAction {
            order_no: "ORD202601010008".to_string(),
            items: vec![item(10, 1)],
        };

        let result = action
            .execute(&mut ctx, &create_test_metadata(Role::Supplier))
            .await;
        assert!(matches!(result, Err(OrderError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_create_order_unknown_product_fails() {
        let storage = Storage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        seed_consumer(&txn, 1);

        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = CreateOrderAction {
            order_no: "ORD202601010009".to_string(),
            items: vec![item(404, 1)],
        };

        let result = action
            .execute(&mut ctx, &create_test_metadata(Role::Consumer))
            .await;
        assert!(matches!(result, Err(OrderError::ProductNotFound(404))));
    }
}
