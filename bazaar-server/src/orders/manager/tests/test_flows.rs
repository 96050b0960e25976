use super::*;

#[test]
fn test_full_lifecycle_with_payout() {
    let (manager, catalog, accounts) = create_test_services();
    let consumer_id = seed_consumer(&accounts, 1000.0);
    let supplier_a = seed_supplier(&accounts);
    let supplier_b = seed_supplier(&accounts);
    let product_a = seed_product(&catalog, supplier_a, 100.0, 10);
    let product_b = seed_product(&catalog, supplier_b, 50.0, 10);

    // Create: 1 × 100 + 2 × 50 = 200
    let order_id = create_order(
        &manager,
        consumer_id,
        vec![simple_item(product_a, 1), simple_item(product_b, 2)],
    );
    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.total_amount, 200.0);
    assert_eq!(snapshot.status, OrderStatus::PendingPayment);

    // Pay: consumer 1000 → 800
    pay_order(&manager, consumer_id, &order_id);
    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::PendingShipment);
    assert_eq!(snapshot.payment_method.as_deref(), Some("WALLET"));
    assert!(snapshot.paid_at.is_some());
    assert_eq!(accounts.get_account(consumer_id).unwrap().balance, 800.0);

    // Ship
    ship_order(&manager, &order_id);
    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Shipping);
    assert!(snapshot.shipped_at.is_some());

    // In transit
    let resp = manager.execute_command(admin_cmd(OrderCommandPayload::MarkInTransit {
        order_id: order_id.clone(),
    }));
    assert!(resp.success);
    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::InTransit);

    // Deliver: sales counters move
    deliver_order(&manager, &order_id);
    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Delivered);
    assert!(snapshot.delivered_at.is_some());
    assert_eq!(catalog.get_product(product_a).unwrap().sales, 1);
    assert_eq!(catalog.get_product(product_b).unwrap().sales, 2);

    // Payout at 10% commission: A gets 90, B gets 90, platform keeps 20
    let resp = manager.execute_command(admin_cmd(OrderCommandPayload::ApprovePayout {
        order_id: order_id.clone(),
    }));
    assert!(resp.success, "Payout failed: {:?}", resp.error);

    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Delivered);
    assert!(snapshot.payout_approved);
    assert_eq!(snapshot.commission_amount, Some(20.0));
    assert!(snapshot.payout_at.is_some());
    assert_eq!(accounts.get_account(supplier_a).unwrap().balance, 90.0);
    assert_eq!(accounts.get_account(supplier_b).unwrap().balance, 90.0);

    // Settled orders leave the active index
    assert!(manager.get_active_orders().unwrap().is_empty());
}

#[test]
fn test_cancel_restores_stock_exactly() {
    let (manager, catalog, accounts) = create_test_services();
    let consumer_id = seed_consumer(&accounts, 1000.0);
    let supplier_id = seed_supplier(&accounts);
    let product_id = seed_product(&catalog, supplier_id, 10.0, 5);

    let order_id = create_order(&manager, consumer_id, vec![simple_item(product_id, 3)]);
    assert_eq!(catalog.get_product(product_id).unwrap().stock, 2);

    let resp = manager.execute_command(consumer_cmd(
        consumer_id,
        OrderCommandPayload::CancelOrder {
            order_id: order_id.clone(),
        },
    ));
    assert!(resp.success);

    // Pre-order stock value restored exactly
    assert_eq!(catalog.get_product(product_id).unwrap().stock, 5);

    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Cancelled);
    assert!(snapshot.cancelled_at.is_some());
    assert!(manager.get_active_orders().unwrap().is_empty());
}

#[test]
fn test_pay_insufficient_funds_preserves_state() {
    let (manager, catalog, accounts) = create_test_services();
    let consumer_id = seed_consumer(&accounts, 500.0);
    let supplier_id = seed_supplier(&accounts);
    let product_id = seed_product(&catalog, supplier_id, 1000.0, 5);

    let order_id = create_order(&manager, consumer_id, vec![simple_item(product_id, 1)]);

    let resp = manager.execute_command(consumer_cmd(
        consumer_id,
        OrderCommandPayload::PayOrder {
            order_id: order_id.clone(),
            method: "WALLET".to_string(),
        },
    ));

    assert!(!resp.success);
    assert_eq!(error_code(&resp), CommandErrorCode::InsufficientFunds);

    // Order stays payable, stock stays reserved, balance untouched
    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::PendingPayment);
    assert_eq!(catalog.get_product(product_id).unwrap().stock, 4);
    assert_eq!(accounts.get_account(consumer_id).unwrap().balance, 500.0);
}

#[test]
fn test_double_pay_fails() {
    let (manager, catalog, accounts) = create_test_services();
    let consumer_id = seed_consumer(&accounts, 1000.0);
    let supplier_id = seed_supplier(&accounts);
    let product_id = seed_product(&catalog, supplier_id, 100.0, 5);

    let order_id = create_order(&manager, consumer_id, vec![simple_item(product_id, 1)]);
    pay_order(&manager, consumer_id, &order_id);
    assert_eq!(accounts.get_account(consumer_id).unwrap().balance, 900.0);

    // Paying the same order again is an invalid transition
    let resp = manager.execute_command(consumer_cmd(
        consumer_id,
        OrderCommandPayload::PayOrder {
            order_id: order_id.clone(),
            method: "WALLET".to_string(),
        },
    ));
    assert!(!resp.success);
    assert_eq!(error_code(&resp), CommandErrorCode::InvalidStateTransition);

    // Only one debit happened
    assert_eq!(accounts.get_account(consumer_id).unwrap().balance, 900.0);
}

#[test]
fn test_no_backward_transitions_from_delivered() {
    let (manager, catalog, accounts) = create_test_services();
    let consumer_id = seed_consumer(&accounts, 1000.0);
    let supplier_id = seed_supplier(&accounts);
    let product_id = seed_product(&catalog, supplier_id, 10.0, 5);

    let order_id = create_order(&manager, consumer_id, vec![simple_item(product_id, 1)]);
    to_delivered(&manager, consumer_id, &order_id);

    let backward = [
        consumer_cmd(
            consumer_id,
            OrderCommandPayload::CancelOrder {
                order_id: order_id.clone(),
            },
        ),
        consumer_cmd(
            consumer_id,
            OrderCommandPayload::PayOrder {
                order_id: order_id.clone(),
                method: "WALLET".to_string(),
            },
        ),
        admin_cmd(OrderCommandPayload::ShipOrder {
            order_id: order_id.clone(),
        }),
        admin_cmd(OrderCommandPayload::DeliverOrder {
            order_id: order_id.clone(),
        }),
    ];

    for cmd in backward {
        let resp = manager.execute_command(cmd);
        assert!(!resp.success);
        assert_eq!(error_code(&resp), CommandErrorCode::InvalidStateTransition);
    }

    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Delivered);
}

#[test]
fn test_total_amount_immutable_after_price_change() {
    let (manager, catalog, accounts) = create_test_services();
    let consumer_id = seed_consumer(&accounts, 1000.0);
    let supplier_id = seed_supplier(&accounts);
    let product_id = seed_product(&catalog, supplier_id, 10.0, 5);

    let order_id = create_order(&manager, consumer_id, vec![simple_item(product_id, 2)]);

    // Live price change after order creation
    catalog
        .update_product(
            product_id,
            shared::models::ProductUpdate {
                name: None,
                price: Some(99.0),
                status: None,
            },
        )
        .unwrap();

    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.total_amount, 20.0);
    assert_eq!(snapshot.items[0].unit_price, 10.0);

    // Payment debits the snapshotted total, not the live price
    pay_order(&manager, consumer_id, &order_id);
    assert_eq!(accounts.get_account(consumer_id).unwrap().balance, 980.0);
}

#[test]
fn test_revoke_paid_order_refunds_and_restocks() {
    let (manager, catalog, accounts) = create_test_services();
    let consumer_id = seed_consumer(&accounts, 1000.0);
    let supplier_id = seed_supplier(&accounts);
    let product_id = seed_product(&catalog, supplier_id, 100.0, 5);

    let order_id = create_order(&manager, consumer_id, vec![simple_item(product_id, 2)]);
    pay_order(&manager, consumer_id, &order_id);
    assert_eq!(accounts.get_account(consumer_id).unwrap().balance, 800.0);

    let resp = manager.execute_command(admin_cmd(OrderCommandPayload::RevokeOrder {
        order_id: order_id.clone(),
        reason: Some("listing error".to_string()),
    }));
    assert!(resp.success);

    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Revoked);
    assert!(snapshot.revoked_at.is_some());
    assert_eq!(catalog.get_product(product_id).unwrap().stock, 5);
    assert_eq!(accounts.get_account(consumer_id).unwrap().balance, 1000.0);
    assert!(manager.get_active_orders().unwrap().is_empty());
}

#[test]
fn test_confirm_receipt_by_consumer() {
    let (manager, catalog, accounts) = create_test_services();
    let consumer_id = seed_consumer(&accounts, 1000.0);
    let supplier_id = seed_supplier(&accounts);
    let product_id = seed_product(&catalog, supplier_id, 10.0, 5);

    let order_id = create_order(&manager, consumer_id, vec![simple_item(product_id, 1)]);
    pay_order(&manager, consumer_id, &order_id);
    ship_order(&manager, &order_id);

    let resp = manager.execute_command(consumer_cmd(
        consumer_id,
        OrderCommandPayload::ConfirmReceipt {
            order_id: order_id.clone(),
        },
    ));
    assert!(resp.success);

    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Delivered);
    assert!(snapshot.confirmed_at.is_some());
    assert_eq!(catalog.get_product(product_id).unwrap().sales, 1);
}

#[test]
fn test_supplier_ships_and_delivers_own_order() {
    let (manager, catalog, accounts) = create_test_services();
    let consumer_id = seed_consumer(&accounts, 1000.0);
    let supplier_id = seed_supplier(&accounts);
    let product_id = seed_product(&catalog, supplier_id, 10.0, 5);

    let order_id = create_order(&manager, consumer_id, vec![simple_item(product_id, 1)]);
    pay_order(&manager, consumer_id, &order_id);

    let resp = manager.execute_command(supplier_cmd(
        supplier_id,
        OrderCommandPayload::ShipOrder {
            order_id: order_id.clone(),
        },
    ));
    assert!(resp.success, "Supplier ship failed: {:?}", resp.error);

    let resp = manager.execute_command(supplier_cmd(
        supplier_id,
        OrderCommandPayload::DeliverOrder {
            order_id: order_id.clone(),
        },
    ));
    assert!(resp.success, "Supplier deliver failed: {:?}", resp.error);

    let snapshot = manager.get_snapshot(&order_id).unwrap().unwrap();
    assert_eq!(snapshot.status, OrderStatus::Delivered);
}
