//! Ledger configuration

use rust_decimal::Decimal;
use std::time::Duration;

/// Operational limits for the ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Ceiling per deposit call.
    pub deposit_limit: Decimal,
    /// How long a pending one-time code stays valid.
    pub otp_ttl: Duration,
    /// Failed verification attempts before a pending code is invalidated.
    pub max_otp_attempts: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            deposit_limit: Decimal::from(100_000),
            otp_ttl: Duration::from_secs(300),
            max_otp_attempts: 3,
        }
    }
}
