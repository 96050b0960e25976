//! Inventory Ledger
//!
//! Atomic stock primitives over the products table. There are no raw
//! stock getters/setters across this boundary: callers get `reserve`,
//! `release`, `record_sales` and `adjust_stock`, all of which check and
//! mutate inside the caller's write transaction. A reservation therefore
//! commits or rolls back together with the order transition that caused it,
//! and `stock >= 0` holds at every observable point.
//!
//! redb serializes write transactions, so two reservations against the same
//! product cannot interleave; with one unit left, exactly one of two
//! concurrent `reserve` calls succeeds.

use crate::orders::traits::OrderError;
use crate::storage::PRODUCTS_TABLE;
use crate::utils::now_millis;
use redb::{ReadableTable, WriteTransaction};
use shared::models::Product;

fn storage_err(err: impl std::fmt::Display) -> OrderError {
    OrderError::Storage(err.to_string())
}

/// Load a product row
pub fn get(txn: &WriteTransaction, product_id: u64) -> Result<Product, OrderError> {
    let table = txn.open_table(PRODUCTS_TABLE).map_err(storage_err)?;
    let guard = table
        .get(product_id)
        .map_err(storage_err)?
        .ok_or(OrderError::ProductNotFound(product_id))?;
    serde_json::from_slice(guard.value()).map_err(storage_err)
}

/// Insert or overwrite a product row (catalog administration)
pub fn put(txn: &WriteTransaction, product: &Product) -> Result<(), OrderError> {
    let mut table = txn.open_table(PRODUCTS_TABLE).map_err(storage_err)?;
    let bytes = serde_json::to_vec(product).map_err(storage_err)?;
    table
        .insert(product.id, bytes.as_slice())
        .map_err(storage_err)?;
    Ok(())
}

/// Atomically check and decrement stock
///
/// Fails with `InsufficientStock` when `stock < quantity`; on failure the
/// row is untouched.
pub fn reserve(
    txn: &WriteTransaction,
    product_id: u64,
    quantity: i32,
) -> Result<Product, OrderError> {
    if quantity <= 0 {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    mutate(txn, product_id, |product| {
        let requested = quantity as i64;
        if product.stock < requested {
            return Err(OrderError::InsufficientStock {
                product_id,
                requested,
                available: product.stock,
            });
        }
        product.stock -= requested;
        Ok(())
    })
}

/// Atomically increment stock (cancellation/revocation/restock on return)
///
/// Releasing the same reservation twice is the caller's bug; the ledger
/// does not track reservation identity.
pub fn release(
    txn: &WriteTransaction,
    product_id: u64,
    quantity: i32,
) -> Result<Product, OrderError> {
    if quantity <= 0 {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    mutate(txn, product_id, |product| {
        product.stock += quantity as i64;
        Ok(())
    })
}

/// Increment the sales counter (on delivery)
pub fn record_sales(
    txn: &WriteTransaction,
    product_id: u64,
    quantity: i32,
) -> Result<(), OrderError> {
    if quantity <= 0 {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    mutate(txn, product_id, |product| {
        product.sales += quantity as i64;
        Ok(())
    })?;
    Ok(())
}

/// Adjust stock by a signed delta (supplier restock / correction)
///
/// Fails if the adjustment would take stock below zero.
pub fn adjust_stock(
    txn: &WriteTransaction,
    product_id: u64,
    delta: i64,
) -> Result<Product, OrderError> {
    mutate(txn, product_id, |product| {
        let next = product.stock + delta;
        if next < 0 {
            return Err(OrderError::InsufficientStock {
                product_id,
                requested: -delta,
                available: product.stock,
            });
        }
        product.stock = next;
        Ok(())
    })
}

/// Load-mutate-store under the caller's transaction
fn mutate(
    txn: &WriteTransaction,
    product_id: u64,
    f: impl FnOnce(&mut Product) -> Result<(), OrderError>,
) -> Result<Product, OrderError> {
    let mut table = txn.open_table(PRODUCTS_TABLE).map_err(storage_err)?;

    let mut product: Product = {
        let guard = table
            .get(product_id)
            .map_err(storage_err)?
            .ok_or(OrderError::ProductNotFound(product_id))?;
        serde_json::from_slice(guard.value()).map_err(storage_err)?
    };

    f(&mut product)?;
    product.updated_at = now_millis();

    let bytes = serde_json::to_vec(&product).map_err(storage_err)?;
    table
        .insert(product_id, bytes.as_slice())
        .map_err(storage_err)?;
    Ok(product)
}
