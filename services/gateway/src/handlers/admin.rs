use crate::auth::AdminUser;
use crate::error::AppError;
use crate::models::{AccountView, MessageResponse, SetStatusRequest};
use crate::state::AppState;
use axum::{extract::State, Json};
use ledger::LedgerStats;

pub async fn set_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.ledger.set_status(&request.email, request.status)?;
    Ok(Json(MessageResponse {
        message: format!("User status updated to {}", request.status),
    }))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<AccountView>>, AppError> {
    let accounts = state.ledger.accounts()?;
    Ok(Json(accounts.iter().map(AccountView::from).collect()))
}

pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<LedgerStats>, AppError> {
    Ok(Json(state.ledger.stats()?))
}
