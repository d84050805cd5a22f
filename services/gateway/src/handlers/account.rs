use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{
    AccountView, DeleteAccountRequest, HistoryResponse, MessageResponse, ProfileUpdateRequest,
};
use crate::state::AppState;
use axum::{extract::State, Json};
use ledger::ProfileUpdate;

pub async fn get_account(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<AccountView>, AppError> {
    let account = state.ledger.account(&user.session.email)?;
    Ok(Json(AccountView::from(&account)))
}

/// Transaction history, newest first.
pub async fn get_history(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<HistoryResponse>, AppError> {
    let account = state.ledger.account(&user.session.email)?;
    let mut transactions = account.transactions;
    transactions.reverse();
    Ok(Json(HistoryResponse { transactions }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<Json<AccountView>, AppError> {
    let account = state.ledger.update_profile(
        &user.session.email,
        &request.credential,
        ProfileUpdate {
            name: request.name,
            email: request.new_email,
            credential: request.new_credential,
        },
    )?;
    Ok(Json(AccountView::from(&account)))
}

pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<DeleteAccountRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .ledger
        .delete_account(&user.session.email, &request.credential)?;
    Ok(Json(MessageResponse {
        message: "Account deleted successfully".to_string(),
    }))
}
