use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::account::{Account, AccountStatus, Role, Transaction};
use types::ids::{AccountNumber, SessionToken};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub credential: String,
}

/// Phase-1 response. The code is returned in-band for demo purposes;
/// a real deployment would deliver it out-of-band.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub token: SessionToken,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub account: AccountView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepositRequest {
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawRequest {
    pub credential: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceResponse {
    pub balance: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdateRequest {
    /// Current PIN, re-checked before any change.
    pub credential: String,
    pub name: Option<String>,
    pub new_email: Option<String>,
    pub new_credential: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAccountRequest {
    pub credential: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetStatusRequest {
    pub email: String,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub transactions: Vec<Transaction>,
}

/// Account as exposed over the API: everything except the credential.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub account_number: AccountNumber,
    pub balance: Decimal,
    pub status: AccountStatus,
    pub role: Role,
    pub transaction_count: usize,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            age: account.age,
            email: account.email.clone(),
            account_number: account.account_number.clone(),
            balance: account.balance,
            status: account.status,
            role: account.role,
            transaction_count: account.transactions.len(),
        }
    }
}
