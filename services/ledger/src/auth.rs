//! Auth/OTP Session — two-phase login state
//!
//! Phase 1 (credential check) issues a 6-digit one-time code bound to
//! the identity it was issued for. Phase 2 (code verification) consumes
//! the code and mints a bearer session. Pending codes expire after a
//! TTL and are invalidated after a bounded number of failed attempts;
//! a successful verification always consumes the code.
//!
//! Session state is explicit and keyed by token, never ambient.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::Rng;
use std::time::{Duration, Instant};
use types::errors::LedgerError;
use types::ids::SessionToken;

/// An authenticated session bound to one identity.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct PendingLogin {
    code: String,
    issued_at: Instant,
    attempts: u32,
    is_admin: bool,
}

/// Tracks pending one-time codes and live sessions.
pub struct SessionManager {
    pending: DashMap<String, PendingLogin>,
    sessions: DashMap<SessionToken, Session>,
    otp_ttl: Duration,
    max_attempts: u32,
}

impl SessionManager {
    pub fn new(otp_ttl: Duration, max_attempts: u32) -> Self {
        Self {
            pending: DashMap::new(),
            sessions: DashMap::new(),
            otp_ttl,
            max_attempts,
        }
    }

    /// Record a pending login for a verified identity and return the
    /// code for out-of-band delivery.
    ///
    /// A repeated phase-1 attempt for the same identity replaces any
    /// earlier pending code.
    pub fn issue_code(&self, email: &str, is_admin: bool) -> String {
        let code = rand::thread_rng().gen_range(100_000..1_000_000).to_string();
        self.pending.insert(
            email.to_string(),
            PendingLogin {
                code: code.clone(),
                issued_at: Instant::now(),
                attempts: 0,
                is_admin,
            },
        );
        tracing::info!(email, "one-time code issued");
        code
    }

    /// Verify a submitted code and mint a session on exact match.
    ///
    /// Expired codes and codes with an exhausted attempt budget are
    /// removed; a mismatch burns one attempt and leaves the login
    /// pending until the budget runs out.
    pub fn verify_code(&self, email: &str, code: &str) -> Result<Session, LedgerError> {
        let mut entry = self
            .pending
            .get_mut(email)
            .ok_or_else(|| LedgerError::Auth("No pending login for this identity.".to_string()))?;

        if entry.issued_at.elapsed() > self.otp_ttl {
            drop(entry);
            self.pending.remove(email);
            return Err(LedgerError::Auth("One-time code has expired.".to_string()));
        }

        if entry.code != code {
            entry.attempts += 1;
            let exhausted = entry.attempts >= self.max_attempts;
            drop(entry);
            if exhausted {
                self.pending.remove(email);
                return Err(LedgerError::Auth(
                    "Too many failed attempts; request a new code.".to_string(),
                ));
            }
            tracing::warn!(email, "incorrect one-time code");
            return Err(LedgerError::Auth("Incorrect one-time code.".to_string()));
        }

        let is_admin = entry.is_admin;
        drop(entry);
        self.pending.remove(email);

        let session = Session {
            token: SessionToken::new(),
            email: email.to_string(),
            is_admin,
            created_at: Utc::now(),
        };
        self.sessions.insert(session.token, session.clone());
        tracing::info!(email, is_admin, "session established");
        Ok(session)
    }

    /// Resolve a live session by token.
    pub fn session(&self, token: &SessionToken) -> Option<Session> {
        self.sessions.get(token).map(|s| s.clone())
    }

    /// Drop the session and any pending code for its identity.
    pub fn logout(&self, token: &SessionToken) {
        if let Some((_, session)) = self.sessions.remove(token) {
            self.pending.remove(&session.email);
            tracing::info!(email = %session.email, "logged out");
        }
    }

    /// Drop every session belonging to an identity (account deletion,
    /// email change).
    pub fn revoke_identity(&self, email: &str) {
        self.pending.remove(email);
        self.sessions.retain(|_, s| s.email != email);
    }
}
