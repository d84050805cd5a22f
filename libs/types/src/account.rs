//! Account and transaction types
//!
//! The account is the unit of persistence: it embeds its full
//! transaction history, and the durable dataset is just the array of
//! accounts. Invariant: `balance >= 0` after every mutation, and each
//! appended transaction carries the running balance at append time.

use crate::errors::LedgerError;
use crate::ids::AccountNumber;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Administrative account status; governs withdrawal eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    /// Can transact normally
    Active,
    /// Temporarily barred from withdrawing
    Suspended,
    /// Barred pending administrative review
    Blocked,
}

impl Default for AccountStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Suspended => write!(f, "Suspended"),
            Self::Blocked => write!(f, "Blocked"),
        }
    }
}

impl FromStr for AccountStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Suspended" => Ok(Self::Suspended),
            "Blocked" => Ok(Self::Blocked),
            other => Err(LedgerError::Validation(format!(
                "Unknown account status: {}",
                other
            ))),
        }
    }
}

/// Account role. Admin is a privileged account, not a special-cased
/// identity constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::Customer
    }
}

/// A 4-digit numeric PIN.
///
/// Stored as a string so leading zeros survive serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Validate and construct a credential.
    ///
    /// Rejects anything that is not exactly 4 ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        if raw.len() != 4 || !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(LedgerError::Validation(
                "PIN must be exactly 4 digits.".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Direction of a balance-affecting operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "Deposit"),
            Self::Withdraw => write!(f, "Withdraw"),
        }
    }
}

/// An immutable record of a single deposit or withdrawal.
///
/// `balance_after` is denormalized for audit and history display; it
/// must equal the account's running balance at append time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    /// Second-precision creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
    pub balance_after: Decimal,
}

impl Transaction {
    /// Record a transaction at the current time.
    pub fn new(kind: TransactionKind, amount: Decimal, balance_after: Decimal) -> Self {
        Self {
            kind,
            amount,
            timestamp: Utc::now(),
            balance_after,
        }
    }
}

/// A customer account, unique by email, embedding its transaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub credential: Credential,
    pub account_number: AccountNumber,
    pub balance: Decimal,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// Create a fresh account with zero balance and no history.
    pub fn new(
        name: impl Into<String>,
        age: u32,
        email: impl Into<String>,
        credential: Credential,
        account_number: AccountNumber,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            email: email.into(),
            credential,
            account_number,
            balance: Decimal::ZERO,
            status: AccountStatus::default(),
            role: Role::default(),
            transactions: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, AccountStatus::Active)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Append a transaction, updating the running balance first.
    ///
    /// Callers validate preconditions; this only records the effect.
    pub fn apply(&mut self, kind: TransactionKind, amount: Decimal) -> Decimal {
        match kind {
            TransactionKind::Deposit => self.balance += amount,
            TransactionKind::Withdraw => self.balance -= amount,
        }
        self.transactions
            .push(Transaction::new(kind, amount, self.balance));
        self.balance
    }
}
