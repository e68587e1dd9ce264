use axum::{
    extract::FromRequest,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::{CoordinatorError, LedgerError, SlotError};

/// Central error type for the gateway
///
/// All component failures are translated into exactly one of these at
/// the handler boundary; callers never see partial JSON or stack
/// traces.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payment processor error: {0}")]
    RemoteService(String),

    /// Local and remote state diverged; requires manual admin follow-up
    #[error("Reconciliation required: {0}")]
    Reconciliation(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, "FORBIDDEN"),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT"),
            AppError::RemoteService(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg, "REMOTE_SERVICE_ERROR")
            }
            AppError::Reconciliation(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "RECONCILIATION_REQUIRED",
            ),
            AppError::Storage(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg, "STORAGE_UNAVAILABLE")
            }
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                "INTERNAL_ERROR",
            ),
        };

        let body = Json(json!({
            "error": code,
            "message": error_message
        }));

        (status, body).into_response()
    }
}

/// JSON body extractor that reports malformed input as a plain 400
/// instead of axum's default rejection statuses
pub struct AppJson<T>(pub T);

impl<S, T> axum::extract::FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(AppJson(value))
    }
}

impl From<CoordinatorError> for AppError {
    fn from(err: CoordinatorError) -> Self {
        match &err {
            CoordinatorError::SlotTaken(_) => AppError::Conflict(err.to_string()),
            CoordinatorError::NotFound(_) => AppError::NotFound(err.to_string()),
            CoordinatorError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            CoordinatorError::Payment(_) => AppError::RemoteService(err.to_string()),
            CoordinatorError::ReconciliationRequired { .. }
            | CoordinatorError::PartialFailure { .. } => {
                AppError::Reconciliation(err.to_string())
            }
            CoordinatorError::Storage(_) => AppError::Storage(err.to_string()),
        }
    }
}

impl From<SlotError> for AppError {
    fn from(err: SlotError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match &err {
            LedgerError::NotFound(_) => AppError::NotFound(err.to_string()),
            LedgerError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            LedgerError::Storage(_) => AppError::Storage(err.to_string()),
        }
    }
}
