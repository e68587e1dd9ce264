pub mod orders;
pub mod payments;
pub mod slots;

use crate::models::PingResponse;
use crate::state::AppState;
use axum::{extract::State, Json};

/// Health probe
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        ok: true,
        admin_email_set: !state.admin_email.is_empty(),
    })
}
