//! Types library for the account ledger service
//!
//! Core type definitions shared by the ledger service and its adapters.
//!
//! # Modules
//! - `ids`: Identifier types (AccountNumber, SessionToken)
//! - `account`: Account, Transaction and status/role enums
//! - `errors`: Error taxonomy

pub mod account;
pub mod errors;
pub mod ids;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::account::*;
    pub use crate::errors::*;
    pub use crate::ids::*;
}
