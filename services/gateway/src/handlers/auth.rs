use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{
    AccountView, LoginRequest, LoginResponse, MessageResponse, RegisterResponse, VerifyRequest,
    VerifyResponse,
};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use ledger::RegisterRequest;

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let account = state.ledger.register(request)?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created successfully".to_string(),
            account: AccountView::from(&account),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let code = state
        .ledger
        .begin_login(&request.email, &request.credential)?;
    Ok(Json(LoginResponse {
        message: "Credentials valid; verify the one-time code".to_string(),
        code,
    }))
}

pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let session = state.ledger.verify_code(&request.email, &request.code)?;
    Ok(Json(VerifyResponse {
        token: session.token,
        is_admin: session.is_admin,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Json<MessageResponse> {
    state.ledger.logout(&user.session.token);
    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}
