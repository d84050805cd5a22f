use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use ledger::Session;
use types::ids::SessionToken;

/// Extractor for any authenticated caller (bearer session token).
pub struct AuthenticatedUser {
    pub session: Session,
}

/// Extractor for admin-only routes.
pub struct AdminUser {
    pub session: Session,
}

fn session_from_parts(parts: &Parts, state: &AppState) -> Result<Session, AppError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;
    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid header string".to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Expected a bearer token".to_string()))?;
    let token: SessionToken = token
        .parse()
        .map_err(|_| AppError::Unauthorized("Malformed session token".to_string()))?;

    state
        .ledger
        .session(&token)
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state)?;
        Ok(Self { session })
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts, state)?;
        if !session.is_admin {
            return Err(AppError::Unauthorized(
                "Admin privileges required".to_string(),
            ));
        }
        Ok(Self { session })
    }
}
