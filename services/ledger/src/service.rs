//! Ledger service facade
//!
//! One consolidated implementation of the operation contract, shared by
//! the HTTP gateway and the terminal console. Every mutating operation
//! is a single serialized load-mutate-save cycle against the store;
//! authentication state lives in the session manager.

use crate::auth::{Session, SessionManager};
use crate::config::LedgerConfig;
use crate::engine;
use crate::registry::{self, FindBy};
use crate::store::JsonStore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use types::account::{Account, AccountStatus, Credential, Role, TransactionKind};
use types::errors::LedgerError;
use types::ids::{AccountNumber, SessionToken};

const INVALID_CREDENTIALS: &str = "Invalid email or PIN.";

/// Registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub credential: String,
}

/// Profile fields to change; unset fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub credential: Option<String>,
}

/// Aggregate totals for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerStats {
    pub total_accounts: usize,
    pub total_balance: Decimal,
    pub total_transactions: usize,
    pub active: usize,
    pub suspended: usize,
    pub blocked: usize,
    pub total_deposited: Decimal,
    pub total_withdrawn: Decimal,
}

/// The account ledger service.
pub struct Ledger {
    store: JsonStore,
    sessions: SessionManager,
    config: LedgerConfig,
}

impl Ledger {
    /// Open (or create on first mutation) the ledger at `path`.
    pub fn open(path: impl Into<PathBuf>, config: LedgerConfig) -> Self {
        Self {
            store: JsonStore::new(path),
            sessions: SessionManager::new(config.otp_ttl, config.max_otp_attempts),
            config,
        }
    }

    // ── Registration ────────────────────────────────────────────────

    /// Register a new customer account.
    pub fn register(&self, request: RegisterRequest) -> Result<Account, LedgerError> {
        self.register_with_role(request, Role::Customer)
    }

    /// Seed an admin account if no account exists under `email`.
    ///
    /// Returns `true` when an account was created. Admin is just a
    /// privileged account; everything else about it is ordinary.
    pub fn ensure_admin(&self, request: RegisterRequest) -> Result<bool, LedgerError> {
        match self.register_with_role(request, Role::Admin) {
            Ok(_) => Ok(true),
            Err(LedgerError::Duplicate(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn register_with_role(
        &self,
        request: RegisterRequest,
        role: Role,
    ) -> Result<Account, LedgerError> {
        if request.name.trim().is_empty() {
            return Err(LedgerError::Validation("Name is required.".to_string()));
        }
        // One normalized form for validation, the duplicate check and storage
        let email = request.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(LedgerError::Validation(
                "A valid email is required.".to_string(),
            ));
        }
        if request.age < 18 {
            return Err(LedgerError::Validation(
                "Age must be 18 or above.".to_string(),
            ));
        }
        let credential = Credential::parse(&request.credential)?;

        self.store.transaction(|snapshot| {
            if registry::find(snapshot, &FindBy::email(email)).is_some() {
                return Err(LedgerError::Duplicate(
                    "User with this email already exists.".to_string(),
                ));
            }

            // Retry until unique within the snapshot
            let mut number = AccountNumber::random();
            while registry::find(snapshot, &FindBy::account_number(number.as_str())).is_some() {
                number = AccountNumber::random();
            }

            let mut account = Account::new(
                request.name.trim(),
                request.age,
                email,
                credential.clone(),
                number,
            );
            account.role = role;
            snapshot.accounts.push(account.clone());
            tracing::info!(email = %account.email, account_number = %account.account_number, "account registered");
            Ok(account)
        })
    }

    // ── Authentication ──────────────────────────────────────────────

    /// Login phase 1: verify credentials and issue a one-time code.
    pub fn begin_login(&self, email: &str, credential: &str) -> Result<String, LedgerError> {
        let credential = Credential::parse(credential)
            .map_err(|_| LedgerError::Auth(INVALID_CREDENTIALS.to_string()))?;

        let (email, is_admin) = self.store.read(|snapshot| {
            let account = registry::find(snapshot, &FindBy::credentials(email, &credential))
                .ok_or_else(|| LedgerError::Auth(INVALID_CREDENTIALS.to_string()))?;
            if !account.is_active() {
                tracing::warn!(email = %account.email, status = %account.status, "login rejected");
                return Err(LedgerError::Auth(format!(
                    "Your account is {}. Contact admin.",
                    account.status
                )));
            }
            Ok((account.email.clone(), account.is_admin()))
        })?;

        Ok(self.sessions.issue_code(&email, is_admin))
    }

    /// Login phase 2: verify the one-time code and establish a session.
    pub fn verify_code(&self, email: &str, code: &str) -> Result<Session, LedgerError> {
        self.sessions.verify_code(email, code)
    }

    /// Resolve a live session.
    pub fn session(&self, token: &SessionToken) -> Option<Session> {
        self.sessions.session(token)
    }

    /// Drop the session and any pending code for its identity.
    pub fn logout(&self, token: &SessionToken) {
        self.sessions.logout(token)
    }

    // ── Money movement ──────────────────────────────────────────────

    /// Deposit into the account registered under `email`.
    pub fn deposit(&self, email: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        self.store.transaction(|snapshot| {
            let account = registry::find_mut(snapshot, &FindBy::email(email))
                .ok_or_else(|| LedgerError::NotFound(email.to_string()))?;
            engine::deposit(account, amount, &self.config)
        })
    }

    /// Withdraw from the account, re-checking the credential.
    pub fn withdraw(
        &self,
        email: &str,
        credential: &str,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let credential = Credential::parse(credential)
            .map_err(|_| LedgerError::Auth(INVALID_CREDENTIALS.to_string()))?;
        self.store.transaction(|snapshot| {
            let account = registry::find_mut(snapshot, &FindBy::credentials(email, &credential))
                .ok_or_else(|| LedgerError::Auth(INVALID_CREDENTIALS.to_string()))?;
            engine::withdraw(account, amount)
        })
    }

    // ── Profile management ──────────────────────────────────────────

    /// Change name, email and/or PIN, re-checking the credential.
    pub fn update_profile(
        &self,
        email: &str,
        credential: &str,
        update: ProfileUpdate,
    ) -> Result<Account, LedgerError> {
        let credential = Credential::parse(credential)
            .map_err(|_| LedgerError::Auth(INVALID_CREDENTIALS.to_string()))?;

        let new_credential = match update.credential.as_deref() {
            Some(raw) => Some(Credential::parse(raw)?),
            None => None,
        };
        // One normalized form for validation, the duplicate check and storage
        let new_email = update.email.as_deref().map(str::trim);
        if let Some(new_email) = new_email {
            if new_email.is_empty() || !new_email.contains('@') {
                return Err(LedgerError::Validation(
                    "A valid email is required.".to_string(),
                ));
            }
        }

        let updated = self.store.transaction(|snapshot| {
            if let Some(new_email) = new_email {
                if new_email != email
                    && registry::find(snapshot, &FindBy::email(new_email)).is_some()
                {
                    return Err(LedgerError::Duplicate(
                        "Another user already has this email.".to_string(),
                    ));
                }
            }

            let account = registry::find_mut(snapshot, &FindBy::credentials(email, &credential))
                .ok_or_else(|| LedgerError::Auth(INVALID_CREDENTIALS.to_string()))?;

            if let Some(name) = update.name.as_deref() {
                if !name.trim().is_empty() {
                    account.name = name.trim().to_string();
                }
            }
            if let Some(new_email) = new_email {
                account.email = new_email.to_string();
            }
            if let Some(credential) = new_credential {
                account.credential = credential;
            }
            tracing::info!(email = %account.email, "profile updated");
            Ok(account.clone())
        })?;

        // A changed identity invalidates sessions bound to the old one.
        if updated.email != email {
            self.sessions.revoke_identity(email);
        }
        Ok(updated)
    }

    /// Delete the account and its transaction history.
    pub fn delete_account(&self, email: &str, credential: &str) -> Result<(), LedgerError> {
        let credential = Credential::parse(credential)
            .map_err(|_| LedgerError::Auth(INVALID_CREDENTIALS.to_string()))?;

        self.store.transaction(|snapshot| {
            let index = registry::position(snapshot, &FindBy::email(email))
                .ok_or_else(|| LedgerError::NotFound(email.to_string()))?;
            if snapshot.accounts[index].credential != credential {
                return Err(LedgerError::Auth(INVALID_CREDENTIALS.to_string()));
            }
            snapshot.accounts.remove(index);
            tracing::info!(email, "account deleted");
            Ok(())
        })?;

        self.sessions.revoke_identity(email);
        Ok(())
    }

    // ── Administration ──────────────────────────────────────────────

    /// Set an account's status. Any status is reachable from any other.
    pub fn set_status(&self, email: &str, status: AccountStatus) -> Result<(), LedgerError> {
        self.store.transaction(|snapshot| {
            let account = registry::find_mut(snapshot, &FindBy::email(email))
                .ok_or_else(|| LedgerError::NotFound(email.to_string()))?;
            account.status = status;
            tracing::info!(email, %status, "status changed");
            Ok(())
        })
    }

    /// All accounts, for the admin panel.
    pub fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        self.store.read(|snapshot| Ok(snapshot.accounts.clone()))
    }

    /// The account registered under `email`.
    pub fn account(&self, email: &str) -> Result<Account, LedgerError> {
        self.store.read(|snapshot| {
            registry::find(snapshot, &FindBy::email(email))
                .cloned()
                .ok_or_else(|| LedgerError::NotFound(email.to_string()))
        })
    }

    /// Aggregate totals across all accounts.
    pub fn stats(&self) -> Result<LedgerStats, LedgerError> {
        self.store.read(|snapshot| {
            let mut stats = LedgerStats {
                total_accounts: snapshot.accounts.len(),
                total_balance: Decimal::ZERO,
                total_transactions: 0,
                active: 0,
                suspended: 0,
                blocked: 0,
                total_deposited: Decimal::ZERO,
                total_withdrawn: Decimal::ZERO,
            };
            for account in &snapshot.accounts {
                stats.total_balance += account.balance;
                stats.total_transactions += account.transactions.len();
                match account.status {
                    AccountStatus::Active => stats.active += 1,
                    AccountStatus::Suspended => stats.suspended += 1,
                    AccountStatus::Blocked => stats.blocked += 1,
                }
                for tx in &account.transactions {
                    match tx.kind {
                        TransactionKind::Deposit => stats.total_deposited += tx.amount,
                        TransactionKind::Withdraw => stats.total_withdrawn += tx.amount,
                    }
                }
            }
            Ok(stats)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger(tmp: &TempDir) -> Ledger {
        Ledger::open(tmp.path().join("database.json"), LedgerConfig::default())
    }

    fn request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "A".to_string(),
            age: 30,
            email: email.to_string(),
            credential: "1234".to_string(),
        }
    }

    #[test]
    fn test_register_rejects_minors() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);

        let mut req = request("a@x.com");
        req.age = 17;
        let err = ledger.register(req).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Validation("Age must be 18 or above.".to_string())
        );
        assert!(ledger.accounts().unwrap().is_empty());
    }

    #[test]
    fn test_register_creates_account_with_number() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);

        let account = ledger.register(request("a@x.com")).unwrap();
        assert_eq!(account.balance, Decimal::ZERO);
        assert_eq!(account.account_number.as_str().len(), 7);
        assert_eq!(ledger.account("a@x.com").unwrap(), account);
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);

        let first = ledger.register(request("a@x.com")).unwrap();
        let err = ledger.register(request("a@x.com")).unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate(_)));
        // First account unaffected
        assert_eq!(ledger.account("a@x.com").unwrap(), first);
        assert_eq!(ledger.accounts().unwrap().len(), 1);
    }

    #[test]
    fn test_register_rejects_duplicate_email_with_surrounding_whitespace() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);

        ledger.register(request("a@x.com")).unwrap();
        let err = ledger.register(request(" a@x.com ")).unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate(_)));
        assert_eq!(ledger.accounts().unwrap().len(), 1);
    }

    #[test]
    fn test_register_stores_trimmed_email() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);

        let account = ledger.register(request("  a@x.com  ")).unwrap();
        assert_eq!(account.email, "a@x.com");
        assert!(ledger.account("a@x.com").is_ok());
    }

    #[test]
    fn test_register_rejects_bad_credential() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);

        let mut req = request("a@x.com");
        req.credential = "12ab".to_string();
        assert!(matches!(
            ledger.register(req),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_deposit_then_withdraw_scenario() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();

        assert_eq!(
            ledger.deposit("a@x.com", Decimal::from(500)).unwrap(),
            Decimal::from(500)
        );

        let err = ledger
            .withdraw("a@x.com", "1234", Decimal::from(600))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(ledger.account("a@x.com").unwrap().balance, Decimal::from(500));

        let history = ledger.account("a@x.com").unwrap().transactions;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, TransactionKind::Deposit);
        assert_eq!(history[0].balance_after, Decimal::from(500));
    }

    #[test]
    fn test_deposit_unknown_account_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        assert!(matches!(
            ledger.deposit("ghost@x.com", Decimal::ONE),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_withdraw_with_wrong_pin_is_auth_error() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();
        ledger.deposit("a@x.com", Decimal::from(500)).unwrap();

        assert!(matches!(
            ledger.withdraw("a@x.com", "9999", Decimal::from(100)),
            Err(LedgerError::Auth(_))
        ));
    }

    #[test]
    fn test_blocked_account_cannot_withdraw_but_can_deposit() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();
        ledger.deposit("a@x.com", Decimal::from(500)).unwrap();

        ledger.set_status("a@x.com", AccountStatus::Blocked).unwrap();

        let err = ledger
            .withdraw("a@x.com", "1234", Decimal::from(100))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::AccountNotActive {
                status: AccountStatus::Blocked
            }
        );
        // Documented asymmetry: deposit is not status-gated
        assert!(ledger.deposit("a@x.com", Decimal::from(100)).is_ok());
    }

    #[test]
    fn test_set_status_unknown_account() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        assert!(matches!(
            ledger.set_status("ghost@x.com", AccountStatus::Suspended),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_two_phase_login() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();

        let code = ledger.begin_login("a@x.com", "1234").unwrap();
        assert!(matches!(
            ledger.verify_code("a@x.com", "000000"),
            Err(LedgerError::Auth(_))
        ));
        let session = ledger.verify_code("a@x.com", &code).unwrap();
        assert_eq!(session.email, "a@x.com");
        assert!(!session.is_admin);
        assert!(ledger.session(&session.token).is_some());

        ledger.logout(&session.token);
        assert!(ledger.session(&session.token).is_none());
    }

    #[test]
    fn test_login_rejects_wrong_credentials() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();

        assert!(matches!(
            ledger.begin_login("a@x.com", "0000"),
            Err(LedgerError::Auth(_))
        ));
        assert!(matches!(
            ledger.begin_login("a@x.com", "not-a-pin"),
            Err(LedgerError::Auth(_))
        ));
    }

    #[test]
    fn test_login_rejects_suspended_account_before_issuing_code() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();
        ledger
            .set_status("a@x.com", AccountStatus::Suspended)
            .unwrap();

        let err = ledger.begin_login("a@x.com", "1234").unwrap_err();
        assert!(matches!(err, LedgerError::Auth(_)));
        assert!(err.to_string().contains("Suspended"));
    }

    #[test]
    fn test_admin_login_sets_admin_flag() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        let mut req = request("admin@bank.com");
        req.credential = "9999".to_string();
        assert!(ledger.ensure_admin(req.clone()).unwrap());
        // Second call is a no-op
        assert!(!ledger.ensure_admin(req).unwrap());

        let code = ledger.begin_login("admin@bank.com", "9999").unwrap();
        let session = ledger.verify_code("admin@bank.com", &code).unwrap();
        assert!(session.is_admin);
    }

    #[test]
    fn test_update_profile_changes_fields() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();

        let updated = ledger
            .update_profile(
                "a@x.com",
                "1234",
                ProfileUpdate {
                    name: Some("Alice".to_string()),
                    email: Some("alice@x.com".to_string()),
                    credential: Some("4321".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.email, "alice@x.com");

        // Old identity gone, new credentials work
        assert!(matches!(
            ledger.account("a@x.com"),
            Err(LedgerError::NotFound(_))
        ));
        assert!(ledger.begin_login("alice@x.com", "4321").is_ok());
    }

    #[test]
    fn test_update_profile_rejects_taken_email() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();
        ledger.register(request("b@x.com")).unwrap();

        let err = ledger
            .update_profile(
                "a@x.com",
                "1234",
                ProfileUpdate {
                    email: Some("b@x.com".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate(_)));
    }

    #[test]
    fn test_update_profile_rejects_taken_email_with_surrounding_whitespace() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();
        ledger.register(request("b@x.com")).unwrap();

        let err = ledger
            .update_profile(
                "a@x.com",
                "1234",
                ProfileUpdate {
                    email: Some(" b@x.com ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate(_)));
        // No second account with the same stored email
        let emails: Vec<String> = ledger
            .accounts()
            .unwrap()
            .into_iter()
            .map(|a| a.email)
            .collect();
        assert_eq!(emails.iter().filter(|e| *e == "b@x.com").count(), 1);
    }

    #[test]
    fn test_delete_account_removes_history() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();
        ledger.deposit("a@x.com", Decimal::from(100)).unwrap();

        // Wrong PIN first
        assert!(matches!(
            ledger.delete_account("a@x.com", "0000"),
            Err(LedgerError::Auth(_))
        ));
        ledger.delete_account("a@x.com", "1234").unwrap();
        assert!(matches!(
            ledger.account("a@x.com"),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            ledger.delete_account("a@x.com", "1234"),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_stats_aggregates_totals() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        ledger.register(request("a@x.com")).unwrap();
        ledger.register(request("b@x.com")).unwrap();
        ledger.deposit("a@x.com", Decimal::from(500)).unwrap();
        ledger.deposit("b@x.com", Decimal::from(300)).unwrap();
        ledger
            .withdraw("b@x.com", "1234", Decimal::from(100))
            .unwrap();
        ledger.set_status("b@x.com", AccountStatus::Blocked).unwrap();

        let stats = ledger.stats().unwrap();
        assert_eq!(stats.total_accounts, 2);
        assert_eq!(stats.total_balance, Decimal::from(700));
        assert_eq!(stats.total_transactions, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.total_deposited, Decimal::from(800));
        assert_eq!(stats.total_withdrawn, Decimal::from(100));
    }

    #[test]
    fn test_unique_account_numbers_across_registrations() {
        let tmp = TempDir::new().unwrap();
        let ledger = ledger(&tmp);
        for i in 0..20 {
            ledger.register(request(&format!("user{}@x.com", i))).unwrap();
        }
        let accounts = ledger.accounts().unwrap();
        let mut numbers: Vec<_> = accounts
            .iter()
            .map(|a| a.account_number.as_str().to_string())
            .collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 20);
    }
}
