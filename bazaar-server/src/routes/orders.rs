//! Order lifecycle routes
//!
//! Thin glue: build a command from the caller identity and payload, run it
//! through the OrdersManager, return the refreshed snapshot.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;

use super::Identity;
use crate::core::AppState;
use shared::error::ErrorCode;
use shared::models::{Actor, Role};
use shared::order::{
    CommandError, CommandErrorCode, OrderCommand, OrderCommandPayload, OrderItemInput,
    OrderSnapshot,
};
use shared::{ApiResponse, AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(create_order).get(list_orders))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/cancel", post(cancel_order))
        .route("/api/orders/{id}/pay", post(pay_order))
        .route("/api/orders/{id}/ship", post(ship_order))
        .route("/api/orders/{id}/transit", post(mark_in_transit))
        .route("/api/orders/{id}/deliver", post(deliver_order))
        .route("/api/orders/{id}/confirm", post(confirm_receipt))
        .route("/api/orders/{id}/payout", post(approve_payout))
        .route("/api/orders/{id}/revoke", post(revoke_order))
}

#[derive(Debug, Deserialize)]
struct CreateOrderRequest {
    items: Vec<OrderItemInput>,
}

#[derive(Debug, Deserialize)]
struct PayOrderRequest {
    method: String,
}

#[derive(Debug, Deserialize, Default)]
struct RevokeOrderRequest {
    reason: Option<String>,
}

/// Map a command pipeline error to the HTTP error model
fn command_error(err: CommandError) -> AppError {
    let code = match err.code {
        CommandErrorCode::OrderNotFound => ErrorCode::OrderNotFound,
        CommandErrorCode::ProductNotFound => ErrorCode::ProductNotFound,
        CommandErrorCode::AccountNotFound => ErrorCode::AccountNotFound,
        CommandErrorCode::ProductUnavailable => ErrorCode::ProductUnavailable,
        CommandErrorCode::InsufficientStock => ErrorCode::InsufficientStock,
        CommandErrorCode::InsufficientFunds => ErrorCode::InsufficientFunds,
        CommandErrorCode::InvalidStateTransition => ErrorCode::InvalidStateTransition,
        CommandErrorCode::Unauthorized => ErrorCode::PermissionDenied,
        CommandErrorCode::EmptyOrder => ErrorCode::EmptyOrder,
        CommandErrorCode::InvalidQuantity => ErrorCode::InvalidQuantity,
        CommandErrorCode::InvalidAmount => ErrorCode::InvalidAmount,
        CommandErrorCode::InvalidOperation => ErrorCode::ValidationFailed,
        CommandErrorCode::DuplicateCommand => ErrorCode::DuplicateCommand,
        CommandErrorCode::InternalError => ErrorCode::InternalError,
        CommandErrorCode::StorageFull => ErrorCode::StorageFull,
        CommandErrorCode::OutOfMemory => ErrorCode::OutOfMemory,
        CommandErrorCode::StorageCorrupted => ErrorCode::StorageCorrupted,
        CommandErrorCode::SystemBusy => ErrorCode::SystemBusy,
    };
    AppError::with_message(code, err.message)
}

/// Execute a command and return the refreshed snapshot
fn execute(state: &AppState, actor: Actor, payload: OrderCommandPayload) -> AppResult<OrderSnapshot> {
    let target = payload.order_id().map(str::to_string);

    let cmd = OrderCommand::new(actor.id, actor.name, actor.role, payload);
    let resp = state.orders.execute_command(cmd);
    if !resp.success {
        return Err(command_error(resp.error.unwrap_or_else(|| {
            CommandError::new(CommandErrorCode::InternalError, "command failed")
        })));
    }

    let order_id = resp
        .order_id
        .or(target)
        .ok_or_else(|| AppError::internal("command response carried no order id"))?;
    fetch_snapshot(state, &order_id)
}

fn fetch_snapshot(state: &AppState, order_id: &str) -> AppResult<OrderSnapshot> {
    state
        .orders
        .get_snapshot(order_id)
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::OrderNotFound,
                format!("Order not found: {}", order_id),
            )
        })
}

/// Whether the caller is allowed to see this order
fn can_view(actor: &Actor, snapshot: &OrderSnapshot) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::Consumer => snapshot.consumer_id == actor.id,
        Role::Supplier => snapshot.has_supplier(actor.id),
    }
}

async fn create_order(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let snapshot = execute(
        &state,
        actor,
        OrderCommandPayload::CreateOrder { items: req.items },
    )?;
    Ok(ApiResponse::success(snapshot))
}

async fn list_orders(
    State(state): State<AppState>,
    Identity(actor): Identity,
) -> AppResult<ApiResponse<Vec<OrderSnapshot>>> {
    let orders = state
        .orders
        .get_active_orders()
        .map_err(|e| AppError::database(e.to_string()))?
        .into_iter()
        .filter(|snapshot| can_view(&actor, snapshot))
        .collect();
    Ok(ApiResponse::success(orders))
}

async fn get_order(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let snapshot = fetch_snapshot(&state, &id)?;
    if !can_view(&actor, &snapshot) {
        return Err(AppError::permission_denied(format!(
            "account {} cannot view order {}",
            actor.id, id
        )));
    }
    Ok(ApiResponse::success(snapshot))
}

async fn cancel_order(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let snapshot = execute(&state, actor, OrderCommandPayload::CancelOrder { order_id: id })?;
    Ok(ApiResponse::success(snapshot))
}

async fn pay_order(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<String>,
    Json(req): Json<PayOrderRequest>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let snapshot = execute(
        &state,
        actor,
        OrderCommandPayload::PayOrder {
            order_id: id,
            method: req.method,
        },
    )?;
    Ok(ApiResponse::success(snapshot))
}

async fn ship_order(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let snapshot = execute(&state, actor, OrderCommandPayload::ShipOrder { order_id: id })?;
    Ok(ApiResponse::success(snapshot))
}

async fn mark_in_transit(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let snapshot = execute(&state, actor, OrderCommandPayload::MarkInTransit { order_id: id })?;
    Ok(ApiResponse::success(snapshot))
}

async fn deliver_order(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let snapshot = execute(&state, actor, OrderCommandPayload::DeliverOrder { order_id: id })?;
    Ok(ApiResponse::success(snapshot))
}

async fn confirm_receipt(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let snapshot = execute(&state, actor, OrderCommandPayload::ConfirmReceipt { order_id: id })?;
    Ok(ApiResponse::success(snapshot))
}

async fn approve_payout(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let snapshot = execute(&state, actor, OrderCommandPayload::ApprovePayout { order_id: id })?;
    Ok(ApiResponse::success(snapshot))
}

async fn revoke_order(
    State(state): State<AppState>,
    Identity(actor): Identity,
    Path(id): Path<String>,
    Json(req): Json<RevokeOrderRequest>,
) -> AppResult<ApiResponse<OrderSnapshot>> {
    let snapshot = execute(
        &state,
        actor,
        OrderCommandPayload::RevokeOrder {
            order_id: id,
            reason: req.reason,
        },
    )?;
    Ok(ApiResponse::success(snapshot))
}
