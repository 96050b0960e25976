//! Return workflow routes

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;
use validator::Validate;

use super::Identity;
use crate::core::AppState;
use shared::models::{ReturnRequest, ReturnRequestCreate, ReturnStatus, Role};
use shared::{ApiResponse, AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/returns", post(create_return))
        .route("/api/returns/{id}", get(get_return))
        .route("/api/returns/{id}/process", post(process_return))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateReturnRequest {
    #[validate(length(min = 1))]
    order_id: String,
    product_id: u64,
    #[validate(length(min = 1, max = 2000))]
    reason: String,
}

#[derive(Debug, Deserialize)]
struct ProcessReturnRequest {
    status: ReturnStatus,
    resolution: Option<String>,
}

async fn create_return(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Json(req): Json<CreateReturnRequest>,
) -> AppResult<ApiResponse<ReturnRequest>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let request = state.returns.create_request(
        &actor,
        ReturnRequestCreate {
            order_id: req.order_id,
            product_id: req.product_id,
            reason: req.reason,
        },
    )?;
    Ok(ApiResponse::success(request))
}

async fn process_return(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<u64>,
    Json(req): Json<ProcessReturnRequest>,
) -> AppResult<ApiResponse<ReturnRequest>> {
    let request = state
        .returns
        .process_request(&actor, id, req.status, req.resolution)?;
    Ok(ApiResponse::success(request))
}

async fn get_return(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<u64>,
) -> AppResult<ApiResponse<ReturnRequest>> {
    let request = state.returns.get_request(id)?;

    let involved = match actor.role {
        Role::Admin => true,
        Role::Consumer => request.consumer_id == actor.id,
        Role::Supplier => request.supplier_id == actor.id,
    };
    if !involved {
        return Err(AppError::permission_denied(format!(
            "account {} cannot view return {}",
            actor.id, id
        )));
    }
    Ok(ApiResponse::success(request))
}
