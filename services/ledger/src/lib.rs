//! Account ledger service
//!
//! Owns the durable snapshot of all accounts and implements the full
//! operation contract: registration, two-phase OTP login,
//! deposit/withdraw, profile management and administrative status
//! control. Front-end adapters (HTTP gateway, terminal console) stay
//! thin and call through [`service::Ledger`].
//!
//! # Modules
//! - `store`: durable JSON snapshot with atomic replace and a
//!   single-writer lock
//! - `registry`: account lookups over a loaded snapshot
//! - `engine`: deposit/withdraw mutation rules
//! - `auth`: pending one-time codes and bearer sessions
//! - `config`: operational limits
//! - `service`: the consolidated facade

pub mod auth;
pub mod config;
pub mod engine;
pub mod registry;
pub mod service;
pub mod store;

pub use auth::Session;
pub use config::LedgerConfig;
pub use service::{Ledger, LedgerStats, ProfileUpdate, RegisterRequest};
