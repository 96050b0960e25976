//! Review Gate
//!
//! One review per (order item, author role), enforced by an index table.
//! Eligibility is order status DELIVERED, the state that says the consumer
//! has the product. The author role tag lets a consumer review and a staff
//! review coexist on the same item.

use crate::storage::{REVIEW_ID_COUNTER, REVIEW_KEYS_TABLE, REVIEWS_TABLE, Storage, StorageError};
use crate::utils::now_millis;
use redb::ReadableTable;
use shared::error::ErrorCode;
use shared::models::{Actor, ProductReview, ReviewCreate, Role};
use shared::{AppError, AppResult};
use tracing::info;

/// Review gate service
#[derive(Clone)]
pub struct ReviewService {
    storage: Storage,
}

impl ReviewService {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Create a review for a delivered order item
    pub fn create_review(&self, actor: &Actor, payload: ReviewCreate) -> AppResult<ProductReview> {
        if !(1..=5).contains(&payload.rating) {
            return Err(AppError::with_message(
                ErrorCode::InvalidRating,
                format!("rating must be between 1 and 5, got {}", payload.rating),
            ));
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

        // The owning consumer reviews their purchase; admins/staff may add
        // their own review under the admin role tag
        match actor.role {
            Role::Admin => {}
            Role::Consumer if order.consumer_id == actor.id => {}
            _ => {
                return Err(AppError::permission_denied(format!(
                    "account {} cannot review order {}",
                    actor.id, payload.order_id
                )));
            }
        }

        if !order.status.is_received() {
            return Err(AppError::with_message(
                ErrorCode::ReviewNotEligible,
                format!(
                    "order {} is {}, reviews require a received order",
                    payload.order_id, order.status
                ),
            ));
        }

        if order.find_item(payload.product_id).is_none() {
            return Err(AppError::with_message(
                ErrorCode::ProductNotFound,
                format!(
                    "order {} has no line for product {}",
                    payload.order_id, payload.product_id
                ),
            ));
        }

        // One review per (order item, author role)
        let key = (
            payload.order_id.as_str(),
            payload.product_id,
            actor.role.as_str(),
        );
        {
            let keys = txn
                .open_table(REVIEW_KEYS_TABLE)
                .map_err(|e| AppError::database(e.to_string()))?;
            if keys
                .get(key)
                .map_err(|e| AppError::database(e.to_string()))?
                .is_some()
            {
                return Err(AppError::with_message(
                    ErrorCode::DuplicateReview,
                    format!(
                        "a {} review already exists for order {} product {}",
                        actor.role, payload.order_id, payload.product_id
                    ),
                ));
            }
        }

        let id = self.storage.next_id(&txn, REVIEW_ID_COUNTER)?;
        let review = ProductReview {
            id,
            order_id: payload.order_id,
            product_id: payload.product_id,
            author_id: actor.id,
            author_role: actor.role,
            rating: payload.rating,
            comment: payload.comment,
            created_at: now_millis(),
        };

        {
            let mut table = txn
                .open_table(REVIEWS_TABLE)
                .map_err(|e| AppError::database(e.to_string()))?;
            let bytes =
                serde_json::to_vec(&review).map_err(|e| AppError::database(e.to_string()))?;
            table
                .insert(id, bytes.as_slice())
                .map_err(|e| AppError::database(e.to_string()))?;
        }
        {
            let mut keys = txn
                .open_table(REVIEW_KEYS_TABLE)
                .map_err(|e| AppError::database(e.to_string()))?;
            keys.insert(
                (
                    review.order_id.as_str(),
                    review.product_id,
                    review.author_role.as_str(),
                ),
                id,
            )
            .map_err(|e| AppError::database(e.to_string()))?;
        }
        txn.commit().map_err(StorageError::from)?;

        info!(
            review_id = id,
            order_id = %review.order_id,
            product_id = review.product_id,
            rating = review.rating,
            "Review created"
        );
        Ok(review)
    }

    /// All reviews for a product
    pub fn list_for_product(&self, product_id: u64) -> AppResult<Vec<ProductReview>> {
        let read_txn = self.storage.begin_read()?;
        let table = read_txn
            .open_table(REVIEWS_TABLE)
            .map_err(|e| AppError::database(e.to_string()))?;
        let mut reviews = Vec::new();
        for entry in table.iter().map_err(|e| AppError::database(e.to_string()))? {
            let (_, value) = entry.map_err(|e| AppError::database(e.to_string()))?;
            let review: ProductReview = serde_json::from_slice(value.value())
                .map_err(|e| AppError::database(e.to_string()))?;
            if review.product_id == product_id {
                reviews.push(review);
            }
        }
        Ok(reviews)
    }
}
