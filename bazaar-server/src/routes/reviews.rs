//! Review routes

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;
use validator::Validate;

use super::Identity;
use crate::core::AppState;
use shared::models::{ProductReview, ReviewCreate};
use shared::{ApiResponse, AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reviews", post(create_review))
        .route("/api/products/{id}/reviews", get(list_product_reviews))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateReviewRequest {
    #[validate(length(min = 1))]
    order_id: String,
    product_id: u64,
    #[validate(range(min = 1, max = 5))]
    rating: u8,
    #[validate(length(max = 4000))]
    comment: String,
}

async fn create_review(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<ApiResponse<ProductReview>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let review = state.reviews.create_review(
        &actor,
        ReviewCreate {
            order_id: req.order_id,
            product_id: req.product_id,
            rating: req.rating,
            comment: req.comment,
        },
    )?;
    Ok(ApiResponse::success(review))
}

async fn list_product_reviews(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<ApiResponse<Vec<ProductReview>>> {
    Ok(ApiResponse::success(state.reviews.list_for_product(id)?))
}
