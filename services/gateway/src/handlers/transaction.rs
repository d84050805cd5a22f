use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{BalanceResponse, DepositRequest, WithdrawRequest};
use crate::state::AppState;
use axum::{extract::State, Json};

pub async fn deposit(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<DepositRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state.ledger.deposit(&user.session.email, request.amount)?;
    Ok(Json(BalanceResponse { balance }))
}

pub async fn withdraw(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = state.ledger.withdraw(
        &user.session.email,
        &request.credential,
        request.amount,
    )?;
    Ok(Json(BalanceResponse { balance }))
}
