//! Product catalog routes

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;
use validator::Validate;

use super::Identity;
use crate::core::AppState;
use shared::models::{Product, ProductCreate, ProductStatus, ProductUpdate, Role};
use shared::{ApiResponse, AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", post(create_product).get(list_products))
        .route("/api/products/{id}", get(get_product).put(update_product))
        .route("/api/products/{id}/restock", post(restock))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateProductRequest {
    #[validate(length(min = 1, max = 200))]
    name: String,
    /// Required for admins; suppliers always create under their own account
    supplier_id: Option<u64>,
    #[validate(range(min = 0.0))]
    price: f64,
    #[validate(range(min = 0))]
    stock: i64,
    status: Option<ProductStatus>,
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    name: Option<String>,
    #[validate(range(min = 0.0))]
    price: Option<f64>,
    status: Option<ProductStatus>,
}

#[derive(Debug, Deserialize)]
struct RestockRequest {
    delta: i64,
}

async fn create_product(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Json(req): Json<CreateProductRequest>,
) -> AppResult<ApiResponse<Product>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let supplier_id = match actor.role {
        Role::Supplier => actor.id,
        Role::Admin => req
            .supplier_id
            .ok_or_else(|| AppError::validation("supplier_id is required"))?,
        Role::Consumer => {
            return Err(AppError::permission_denied("consumers cannot list products"));
        }
    };

    let product = state.catalog.create_product(ProductCreate {
        name: req.name,
        supplier_id,
        price: req.price,
        stock: req.stock,
        status: req.status,
    })?;
    Ok(ApiResponse::success(product))
}

async fn list_products(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Product>>> {
    Ok(ApiResponse::success(state.catalog.list_products()?))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<ApiResponse<Product>> {
    Ok(ApiResponse::success(state.catalog.get_product(id)?))
}

async fn update_product(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<u64>,
    Json(req): Json<UpdateProductRequest>,
) -> AppResult<ApiResponse<Product>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    require_owner_or_admin(&state, &actor, id)?;

    let product = state.catalog.update_product(
        id,
        ProductUpdate {
            name: req.name,
            price: req.price,
            status: req.status,
        },
    )?;
    Ok(ApiResponse::success(product))
}

async fn restock(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<u64>,
    Json(req): Json<RestockRequest>,
) -> AppResult<ApiResponse<Product>> {
    require_owner_or_admin(&state, &actor, id)?;
    Ok(ApiResponse::success(state.catalog.restock(id, req.delta)?))
}

fn require_owner_or_admin(
    state: &AppState,
    actor: &shared::models::Actor,
    product_id: u64,
) -> AppResult<()> {
    if actor.role == Role::Admin {
        return Ok(());
    }
    let product = state.catalog.get_product(product_id)?;
    if actor.role == Role::Supplier && product.supplier_id == actor.id {
        return Ok(());
    }
    Err(AppError::permission_denied(format!(
        "account {} cannot manage product {}",
        actor.id, product_id
    )))
}
