use crate::auth::AdminUser;
use crate::error::{AppError, AppJson};
use crate::models::{PaymentActionRequest, PaymentActionResponse};
use crate::state::AppState;
use axum::{extract::State, Json};

/// `POST /pp-capture`: admin: collect the held funds for an order
pub async fn capture_order(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(payload): AppJson<PaymentActionRequest>,
) -> Result<Json<PaymentActionResponse>, AppError> {
    let id = payload
        .id
        .ok_or_else(|| AppError::BadRequest("id required".to_string()))?;
    let order = state.coordinator.capture_order(&id).await?;
    Ok(Json(PaymentActionResponse {
        ok: true,
        status: order.status,
    }))
}

/// `POST /pp-void`: admin: release the hold and free the slot
pub async fn void_order(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(payload): AppJson<PaymentActionRequest>,
) -> Result<Json<PaymentActionResponse>, AppError> {
    let id = payload
        .id
        .ok_or_else(|| AppError::BadRequest("id required".to_string()))?;
    let order = state.coordinator.void_order(&id).await?;
    Ok(Json(PaymentActionResponse {
        ok: true,
        status: order.status,
    }))
}
