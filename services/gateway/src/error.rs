use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::LedgerError;

/// Central error type for the gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            AppError::Ledger(err) => {
                let code = match &err {
                    LedgerError::Validation(_) => ("VALIDATION_ERROR", StatusCode::BAD_REQUEST),
                    LedgerError::NotFound(_) => ("NOT_FOUND", StatusCode::NOT_FOUND),
                    LedgerError::Duplicate(_) => ("DUPLICATE", StatusCode::CONFLICT),
                    LedgerError::Auth(_) => ("AUTH_ERROR", StatusCode::UNAUTHORIZED),
                    LedgerError::InsufficientBalance { .. } => {
                        ("INSUFFICIENT_BALANCE", StatusCode::BAD_REQUEST)
                    }
                    LedgerError::AccountNotActive { .. } => {
                        ("ACCOUNT_NOT_ACTIVE", StatusCode::FORBIDDEN)
                    }
                    LedgerError::Storage(_) => {
                        ("STORAGE_ERROR", StatusCode::INTERNAL_SERVER_ERROR)
                    }
                };
                (code.1, err.to_string(), code.0)
            }
            AppError::InternalError(_) => (
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
