use super::*;
use crate::services::{AccountService, CatalogService};
use shared::models::{AccountCreate, ProductCreate, Role};
use shared::order::{CommandErrorCode, OrderItemInput, OrderStatus};

mod test_flows;

const COMMISSION_RATE: f64 = 0.10;

fn create_test_services() -> (OrdersManager, CatalogService, AccountService) {
    let storage = Storage::open_in_memory().unwrap();
    let manager = OrdersManager::with_storage(storage.clone(), COMMISSION_RATE);
    let catalog = CatalogService::new(storage.clone());
    let accounts = AccountService::new(storage, 0.0);
    (manager, catalog, accounts)
}

fn seed_consumer(accounts: &AccountService, balance: f64) -> u64 {
    accounts
        .create_account(AccountCreate {
            name: "Test Consumer".to_string(),
            role: Role::Consumer,
            opening_balance: Some(balance),
        })
        .unwrap()
        .id
}

fn seed_supplier(accounts: &AccountService) -> u64 {
    accounts
        .create_account(AccountCreate {
            name: "Test Supplier".to_string(),
            role: Role::Supplier,
            opening_balance: Some(0.0),
        })
        .unwrap()
        .id
}

fn seed_product(catalog: &CatalogService, supplier_id: u64, price: f64, stock: i64) -> u64 {
    catalog
        .create_product(ProductCreate {
            name: "Test Product".to_string(),
            supplier_id,
            price,
            stock,
            status: None,
        })
        .unwrap()
        .id
}

fn simple_item(product_id: u64, quantity: i32) -> OrderItemInput {
    OrderItemInput {
        product_id,
        quantity,
    }
}

fn consumer_cmd(consumer_id: u64, payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand::new(consumer_id, "Test Consumer".to_string(), Role::Consumer, payload)
}

fn supplier_cmd(supplier_id: u64, payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand::new(supplier_id, "Test Supplier".to_string(), Role::Supplier, payload)
}

fn admin_cmd(payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand::new(999, "Test Admin".to_string(), Role::Admin, payload)
}

// ========================================================================
// Helper: drive an order through the lifecycle
// ========================================================================

fn create_order(manager: &OrdersManager, consumer_id: u64, items: Vec<OrderItemInput>) -> String {
    let resp = manager.execute_command(consumer_cmd(
        consumer_id,
        OrderCommandPayload::CreateOrder { items },
    ));
    assert!(resp.success, "Failed to create order: {:?}", resp.error);
    resp.order_id.unwrap()
}

fn pay_order(manager: &OrdersManager, consumer_id: u64, order_id: &str) {
    let resp = manager.execute_command(consumer_cmd(
        consumer_id,
        OrderCommandPayload::PayOrder {
            order_id: order_id.to_string(),
            method: "WALLET".to_string(),
        },
    ));
    assert!(resp.success, "Failed to pay order: {:?}", resp.error);
}

fn ship_order(manager: &OrdersManager, order_id: &str) {
    let resp = manager.execute_command(admin_cmd(OrderCommandPayload::ShipOrder {
        order_id: order_id.to_string(),
    }));
    assert!(resp.success, "Failed to ship order: {:?}", resp.error);
}

fn deliver_order(manager: &OrdersManager, order_id: &str) {
    let resp = manager.execute_command(admin_cmd(OrderCommandPayload::DeliverOrder {
        order_id: order_id.to_string(),
    }));
    assert!(resp.success, "Failed to deliver order: {:?}", resp.error);
}

fn to_delivered(manager: &OrdersManager, consumer_id: u64, order_id: &str) {
    pay_order(manager, consumer_id, order_id);
    ship_order(manager, order_id);
    deliver_order(manager, order_id);
}

fn error_code(resp: &CommandResponse) -> CommandErrorCode {
    resp.error
        .as_ref()
        .expect("expected an error response")
        .code
        .clone()
}
