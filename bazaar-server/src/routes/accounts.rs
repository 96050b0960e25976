//! Account routes

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;
use validator::Validate;

use super::Identity;
use crate::core::AppState;
use shared::models::{Account, AccountCreate, Role};
use shared::{ApiResponse, AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/accounts", post(create_account))
        .route("/api/accounts/{id}", get(get_account))
}

#[derive(Debug, Deserialize, Validate)]
struct CreateAccountRequest {
    #[validate(length(min = 1, max = 200))]
    name: String,
    role: Role,
    #[validate(range(min = 0.0))]
    opening_balance: Option<f64>,
}

async fn create_account(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Json(req): Json<CreateAccountRequest>,
) -> AppResult<ApiResponse<Account>> {
    if actor.role != Role::Admin {
        return Err(AppError::permission_denied("only admins create accounts"));
    }
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let account = state.accounts.create_account(AccountCreate {
        name: req.name,
        role: req.role,
        opening_balance: req.opening_balance,
    })?;
    Ok(ApiResponse::success(account))
}

async fn get_account(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<u64>,
) -> AppResult<ApiResponse<Account>> {
    // Wallet balances are private: self or admin only
    if actor.role != Role::Admin && actor.id != id {
        return Err(AppError::permission_denied(format!(
            "account {} cannot view account {}",
            actor.id, id
        )));
    }
    Ok(ApiResponse::success(state.accounts.get_account(id)?))
}
