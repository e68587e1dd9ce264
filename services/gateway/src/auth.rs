use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Identity-provider token claims this gateway cares about
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: usize,
}

/// Extractor for admin-only endpoints
///
/// One reusable authorization predicate for every admin operation:
/// a bearer token signed by the identity provider whose email claim
/// matches the single configured admin email. Anyone else is either
/// unauthenticated (401) or not the admin (403).
pub struct AdminUser {
    pub email: String,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| AppError::Unauthorized("auth required".to_string()))?;
        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("invalid header string".to_string()))?;
        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("auth required".to_string()))?;

        let key = DecodingKey::from_secret(state.jwt_secret.as_ref());
        let token_data = decode::<Claims>(token, &key, &Validation::default())
            .map_err(|e| AppError::Unauthorized(format!("invalid token: {e}")))?;

        let email = token_data.claims.email.to_lowercase();
        if email.is_empty() || email != state.admin_email {
            return Err(AppError::Forbidden(
                "only the configured admin may access this endpoint".to_string(),
            ));
        }

        Ok(AdminUser { email })
    }
}
