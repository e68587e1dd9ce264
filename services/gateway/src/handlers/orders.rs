use crate::auth::AdminUser;
use crate::error::{AppError, AppJson};
use crate::models::{CreateOrderResponse, OrdersResponse, UpdateOrderRequest, UpdateOrderResponse};
use crate::state::AppState;
use axum::{extract::State, Json};
use types::order::OrderDraft;

/// `POST /orders`: public order placement.
///
/// Drives the full reservation flow: the slot is reserved before the
/// order is written, and a lost reservation aborts with nothing
/// created.
pub async fn create_order(
    State(state): State<AppState>,
    AppJson(draft): AppJson<OrderDraft>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let order = state.coordinator.place_order(draft).await?;
    Ok(Json(CreateOrderResponse {
        ok: true,
        id: order.id,
    }))
}

/// `GET /orders`: admin listing, most-recent-first
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<OrdersResponse>, AppError> {
    let orders = state.coordinator.ledger().list().await?;
    Ok(Json(OrdersResponse { orders }))
}

/// `PUT /orders`: admin direct status override.
///
/// Guarded: the transition goes through the order state machine and an
/// override to `voided` frees the slot. Invalid transitions are a
/// conflict, not a silent write.
pub async fn update_order(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(payload): AppJson<UpdateOrderRequest>,
) -> Result<Json<UpdateOrderResponse>, AppError> {
    let id = payload
        .id
        .ok_or_else(|| AppError::BadRequest("id required".to_string()))?;
    let status = payload
        .status
        .ok_or_else(|| AppError::BadRequest("status required".to_string()))?;

    let order = state.coordinator.override_status(&id, status).await?;
    Ok(Json(UpdateOrderResponse {
        ok: true,
        status: order.status,
    }))
}
