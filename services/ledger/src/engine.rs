//! Transaction Engine — deposit and withdraw over a single account
//!
//! Pure mutation functions, called inside the store's critical section.
//! Either the balance change and its transaction record both persist
//! (the caller saves the snapshot afterwards) or neither does (a
//! precondition failure aborts before any state change).
//!
//! Deposit is deliberately not gated by account status; only withdraw
//! checks `Active`. See DESIGN.md for the decision record.

use crate::config::LedgerConfig;
use rust_decimal::Decimal;
use types::account::{Account, TransactionKind};
use types::errors::LedgerError;

/// Credit `amount` to the account and append a Deposit transaction.
///
/// Requires `0 < amount <= config.deposit_limit`. Returns the new
/// balance.
pub fn deposit(
    account: &mut Account,
    amount: Decimal,
    config: &LedgerConfig,
) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO || amount > config.deposit_limit {
        return Err(LedgerError::Validation(format!(
            "Amount must be between 1 and {}.",
            config.deposit_limit
        )));
    }

    let balance = account.apply(TransactionKind::Deposit, amount);
    tracing::info!(email = %account.email, %amount, %balance, "deposit applied");
    Ok(balance)
}

/// Debit `amount` from the account and append a Withdraw transaction.
///
/// Requires the account to be Active, `amount > 0` and
/// `amount <= balance`. Returns the new balance.
pub fn withdraw(account: &mut Account, amount: Decimal) -> Result<Decimal, LedgerError> {
    if !account.is_active() {
        tracing::warn!(email = %account.email, status = %account.status, "withdraw rejected");
        return Err(LedgerError::AccountNotActive {
            status: account.status,
        });
    }
    if amount <= Decimal::ZERO {
        return Err(LedgerError::Validation(
            "Amount must be greater than 0.".to_string(),
        ));
    }
    if amount > account.balance {
        return Err(LedgerError::InsufficientBalance {
            requested: amount,
            available: account.balance,
        });
    }

    let balance = account.apply(TransactionKind::Withdraw, amount);
    tracing::info!(email = %account.email, %amount, %balance, "withdrawal applied");
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use types::account::{AccountStatus, Credential};
    use types::ids::AccountNumber;

    fn account() -> Account {
        Account::new(
            "Alice",
            30,
            "alice@x.com",
            Credential::parse("1234").unwrap(),
            AccountNumber::random(),
        )
    }

    fn config() -> LedgerConfig {
        LedgerConfig::default()
    }

    #[test]
    fn test_deposit_updates_balance_and_log() {
        let mut acc = account();
        let balance = deposit(&mut acc, Decimal::from(500), &config()).unwrap();

        assert_eq!(balance, Decimal::from(500));
        assert_eq!(acc.balance, Decimal::from(500));
        let last = acc.transactions.last().unwrap();
        assert_eq!(last.kind, TransactionKind::Deposit);
        assert_eq!(last.amount, Decimal::from(500));
        assert_eq!(last.balance_after, Decimal::from(500));
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let mut acc = account();
        assert!(matches!(
            deposit(&mut acc, Decimal::ZERO, &config()),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            deposit(&mut acc, Decimal::from(-10), &config()),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(acc.balance, Decimal::ZERO);
        assert!(acc.transactions.is_empty());
    }

    #[test]
    fn test_deposit_rejects_above_limit() {
        let mut acc = account();
        assert!(matches!(
            deposit(&mut acc, Decimal::from(100_001), &config()),
            Err(LedgerError::Validation(_))
        ));
        // Exactly at the limit is fine
        assert!(deposit(&mut acc, Decimal::from(100_000), &config()).is_ok());
    }

    #[test]
    fn test_deposit_ignores_status() {
        let mut acc = account();
        acc.status = AccountStatus::Blocked;
        assert!(deposit(&mut acc, Decimal::from(100), &config()).is_ok());
    }

    #[test]
    fn test_withdraw_happy_path() {
        let mut acc = account();
        deposit(&mut acc, Decimal::from(500), &config()).unwrap();

        let balance = withdraw(&mut acc, Decimal::from(200)).unwrap();
        assert_eq!(balance, Decimal::from(300));
        let last = acc.transactions.last().unwrap();
        assert_eq!(last.kind, TransactionKind::Withdraw);
        assert_eq!(last.balance_after, Decimal::from(300));
    }

    #[test]
    fn test_withdraw_insufficient_balance_leaves_account_unchanged() {
        let mut acc = account();
        deposit(&mut acc, Decimal::from(500), &config()).unwrap();

        let err = withdraw(&mut acc, Decimal::from(600)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                requested: Decimal::from(600),
                available: Decimal::from(500),
            }
        );
        assert_eq!(acc.balance, Decimal::from(500));
        assert_eq!(acc.transactions.len(), 1);
    }

    #[test]
    fn test_withdraw_rejects_non_positive() {
        let mut acc = account();
        deposit(&mut acc, Decimal::from(500), &config()).unwrap();
        assert!(matches!(
            withdraw(&mut acc, Decimal::ZERO),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_withdraw_requires_active_status() {
        for status in [AccountStatus::Suspended, AccountStatus::Blocked] {
            let mut acc = account();
            deposit(&mut acc, Decimal::from(500), &config()).unwrap();
            acc.status = status;

            let err = withdraw(&mut acc, Decimal::from(100)).unwrap_err();
            assert_eq!(err, LedgerError::AccountNotActive { status });
            assert_eq!(acc.balance, Decimal::from(500));
        }
    }

    proptest! {
        /// Any sequence of valid operations keeps the balance
        /// non-negative and every `balance_after` consistent with a
        /// replay of the log.
        #[test]
        fn prop_balance_never_negative(ops in prop::collection::vec((any::<bool>(), 1u32..10_000), 0..50)) {
            let cfg = config();
            let mut acc = account();
            for (is_deposit, raw) in ops {
                let amount = Decimal::from(raw);
                if is_deposit {
                    let _ = deposit(&mut acc, amount, &cfg);
                } else {
                    let _ = withdraw(&mut acc, amount);
                }
                prop_assert!(acc.balance >= Decimal::ZERO);
            }

            let mut running = Decimal::ZERO;
            for tx in &acc.transactions {
                match tx.kind {
                    TransactionKind::Deposit => running += tx.amount,
                    TransactionKind::Withdraw => running -= tx.amount,
                }
                prop_assert_eq!(tx.balance_after, running);
            }
            prop_assert_eq!(acc.balance, running);
        }
    }
}
