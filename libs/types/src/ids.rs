//! Identifier types for ledger entities
//!
//! Account numbers are short human-facing tokens printed on statements;
//! session tokens are UUID v4 values handed out after OTP verification.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*";

/// A 7-character account number: 3 letters, 3 digits and one symbol,
/// randomly permuted.
///
/// The generator performs no uniqueness check on its own; the
/// registration path retries until the token is unique within the
/// current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Generate a fresh account number from the given RNG.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut chars = Vec::with_capacity(7);
        for _ in 0..3 {
            chars.push(*LETTERS.choose(rng).expect("letter alphabet is non-empty"));
        }
        for _ in 0..3 {
            chars.push(*DIGITS.choose(rng).expect("digit alphabet is non-empty"));
        }
        chars.push(*SYMBOLS.choose(rng).expect("symbol alphabet is non-empty"));
        chars.shuffle(rng);
        Self(String::from_utf8(chars).expect("alphabets are ASCII"))
    }

    /// Generate using the thread-local RNG.
    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    /// Create from an existing token (e.g. a deserialized dataset).
    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque bearer token identifying an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// Mint a new random token.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
