//! Catalog service - product administration
//!
//! The order pipeline reads products through the inventory ledger; this
//! service is the surrounding CRUD surface (create/update/list, sale status,
//! restocking). Stock only moves through `inventory::adjust_stock`.

use crate::inventory;
use crate::orders::money;
use crate::storage::{PRODUCT_ID_COUNTER, PRODUCTS_TABLE, Storage};
use crate::utils::now_millis;
use redb::ReadableTable;
use shared::error::ErrorCode;
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::{AppError, AppResult};
use tracing::info;

/// Product catalog service
#[derive(Clone)]
pub struct CatalogService {
    storage: Storage,
}

impl CatalogService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Create a product
    pub fn create_product(&self, payload: ProductCreate) -> AppResult<Product> {
        if payload.name.trim().is_empty() {
            return Err(AppError::validation("product name must not be empty"));
        }
        money::validate_price(payload.price).map_err(AppError::from)?;
        if payload.stock < 0 {
            return Err(AppError::validation("initial stock must not be negative"));
        }

        let txn = self.storage.begin_write()?;
        let id = self.storage.next_id(&txn, PRODUCT_ID_COUNTER)?;
        let now = now_millis();
        let product = Product {
            id,
            name: payload.name,
            supplier_id: payload.supplier_id,
            price: money::round_money(payload.price),
            stock: payload.stock,
            sales: 0,
            status: payload.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        inventory::put(&txn, &product).map_err(AppError::from)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;

        info!(product_id = id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Get a product by id
    pub fn get_product(&self, product_id: u64) -> AppResult<Product> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn
            .open_table(PRODUCTS_TABLE)
            .map_err(|e| AppError::database(e.to_string()))?;
        let guard = table
            .get(product_id)
            .map_err(|e| AppError::database(e.to_string()))?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ProductNotFound,
                    format!("Product not found: {}", product_id),
                )
            })?;
        serde_json::from_slice(guard.value()).map_err(|e| AppError::database(e.to_string()))
    }

    /// List all products
    pub fn list_products(&self) -> AppResult<Vec<Product>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn
            .open_table(PRODUCTS_TABLE)
            .map_err(|e| AppError::database(e.to_string()))?;
        let mut products = Vec::new();
        for entry in table.iter().map_err(|e| AppError::database(e.to_string()))? {
            let (_, value) = entry.map_err(|e| AppError::database(e.to_string()))?;
            products.push(
                serde_json::from_slice(value.value())
                    .map_err(|e| AppError::database(e.to_string()))?,
            );
        }
        Ok(products)
    }

    /// Update name, price and/or sale status
    pub fn update_product(&self, product_id: u64, payload: ProductUpdate) -> AppResult<Product> {
        if let Some(price) = payload.price {
            money::validate_price(price).map_err(AppError::from)?;
        }
        if let Some(name) = &payload.name
            && name.trim().is_empty()
        {
            return Err(AppError::validation("product name must not be empty"));
        }

        let txn = self.storage.begin_write()?;
        let mut product = inventory::get(&txn, product_id).map_err(AppError::from)?;
        if let Some(name) = payload.name {
            product.name = name;
        }
        if let Some(price) = payload.price {
            product.price = money::round_money(price);
        }
        if let Some(status) = payload.status {
            product.status = status;
        }
        product.updated_at = now_millis();
        inventory::put(&txn, &product).map_err(AppError::from)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;
        Ok(product)
    }

    /// Add stock (supplier restock); negative deltas correct overcounts but
    /// can never take stock below zero
    pub fn restock(&self, product_id: u64, delta: i64) -> AppResult<Product> {
        if delta == 0 {
            return Err(AppError::validation("restock delta must not be zero"));
        }
        let txn = self.storage.begin_write()?;
        let product = inventory::adjust_stock(&txn, product_id, delta).map_err(AppError::from)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;

        info!(product_id, delta, stock = product.stock, "Stock adjusted");
        Ok(product)
    }
}
