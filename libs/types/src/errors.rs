//! Error taxonomy for the ledger
//!
//! One variant per failure class in the operation contract, using
//! thiserror. Errors are returned to the immediate caller as structured
//! results; nothing here is retried automatically.

use crate::account::AccountStatus;
use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level ledger error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Malformed or out-of-range input (bad age, bad PIN, bad amount).
    #[error("Validation error: {0}")]
    Validation(String),

    /// No account matches the lookup.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// An account with this email is already registered.
    #[error("Duplicate account: {0}")]
    Duplicate(String),

    /// Credential or one-time-code mismatch, or login attempted on a
    /// Suspended/Blocked account.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Account is not active: status is {status}")]
    AccountNotActive { status: AccountStatus },

    /// Durable-storage I/O or serialization failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Durable-storage failures.
///
/// Carries messages rather than source errors so the taxonomy stays
/// `Clone + PartialEq` for test assertions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(StorageError::from(err))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(StorageError::from(err))
    }
}
