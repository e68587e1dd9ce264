use crate::auth::AdminUser;
use crate::error::{AppError, AppJson};
use crate::models::{AdminSlotRequest, ReserveSlotRequest};
use crate::state::AppState;
use axum::{extract::State, Json};
use booking::slots::ReserveOutcome;
use types::errors::SlotError;
use types::slot::{SlotBoard, SlotIndex};

/// `GET /slots`: public availability board
pub async fn get_slots(State(state): State<AppState>) -> Result<Json<SlotBoard>, AppError> {
    let board = state.coordinator.slots().read().await?;
    Ok(Json(board))
}

/// `POST /slots`: public reservation.
///
/// An already-taken slot (or a reservation that lost the race) is not
/// an error: the caller gets a 200 with the current board and sees the
/// slot gone. Freeing is rejected here; the admin surface owns that.
pub async fn reserve_slot(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ReserveSlotRequest>,
) -> Result<Json<SlotBoard>, AppError> {
    if !payload.reserve {
        return Err(AppError::Forbidden(
            "Freeing is not allowed here.".to_string(),
        ));
    }
    let index = payload
        .slot
        .and_then(SlotIndex::new)
        .ok_or_else(|| AppError::BadRequest("Invalid slot index".to_string()))?;

    let registry = state.coordinator.slots();
    match registry.try_reserve(index).await {
        Ok(ReserveOutcome::Reserved(board)) | Ok(ReserveOutcome::Taken(board)) => Ok(Json(board)),
        // Retry budget exhausted: report the current board, the caller
        // treats it as taken
        Err(SlotError::Contended) => Ok(Json(registry.read().await?)),
        Err(e) => Err(e.into()),
    }
}

/// `GET /admin/slots`: admin read of raw availability
pub async fn admin_get_slots(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<SlotBoard>, AppError> {
    let board = state.coordinator.slots().read().await?;
    Ok(Json(board))
}

/// `POST /admin/slots`: admin availability override
pub async fn admin_set_slot(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppJson(payload): AppJson<AdminSlotRequest>,
) -> Result<Json<SlotBoard>, AppError> {
    let (Some(slot), Some(free)) = (payload.slot, payload.free) else {
        return Err(AppError::BadRequest(
            "Provide { slot: 0..3, free: true|false }".to_string(),
        ));
    };
    let index = SlotIndex::new(slot)
        .ok_or_else(|| AppError::BadRequest("Provide { slot: 0..3, free: true|false }".to_string()))?;

    let board = state.coordinator.slots().set_explicit(index, free).await?;
    Ok(Json(board))
}
