//! Account Registry — lookups over a loaded snapshot
//!
//! Resolves accounts by any combination of email, credential and
//! account number with AND semantics across supplied criteria. Used for
//! authentication lookups (email + credential) and uniqueness checks
//! (email alone).

use crate::store::Snapshot;
use types::account::{Account, Credential};

/// Lookup criteria; unset fields are ignored.
#[derive(Debug, Default, Clone)]
pub struct FindBy<'a> {
    pub email: Option<&'a str>,
    pub credential: Option<&'a Credential>,
    pub account_number: Option<&'a str>,
}

impl<'a> FindBy<'a> {
    pub fn email(email: &'a str) -> Self {
        Self {
            email: Some(email),
            ..Self::default()
        }
    }

    /// Email + credential, the authentication lookup.
    pub fn credentials(email: &'a str, credential: &'a Credential) -> Self {
        Self {
            email: Some(email),
            credential: Some(credential),
            ..Self::default()
        }
    }

    pub fn account_number(number: &'a str) -> Self {
        Self {
            account_number: Some(number),
            ..Self::default()
        }
    }

    fn matches(&self, account: &Account) -> bool {
        if let Some(email) = self.email {
            if account.email != email {
                return false;
            }
        }
        if let Some(credential) = self.credential {
            if &account.credential != credential {
                return false;
            }
        }
        if let Some(number) = self.account_number {
            if account.account_number.as_str() != number {
                return false;
            }
        }
        true
    }
}

/// First account matching all supplied criteria.
pub fn find<'s>(snapshot: &'s Snapshot, by: &FindBy<'_>) -> Option<&'s Account> {
    snapshot.accounts.iter().find(|a| by.matches(a))
}

/// Mutable variant of [`find`].
pub fn find_mut<'s>(snapshot: &'s mut Snapshot, by: &FindBy<'_>) -> Option<&'s mut Account> {
    snapshot.accounts.iter_mut().find(|a| by.matches(&**a))
}

/// Index of the first matching account, for removal.
pub fn position(snapshot: &Snapshot, by: &FindBy<'_>) -> Option<usize> {
    snapshot.accounts.iter().position(|a| by.matches(a))
}
