//! # keel-token
//!
//! Token-ledger capability for the Keel stablecoin module.
//!
//! The external token ledger owns balance storage and double-entry
//! bookkeeping; this crate defines the narrow surface the module consumes
//! and an in-memory implementation for tests. Every balance or supply
//! mutation yields an append-only [`ledger::Effect`] record, which callers
//! compose into audit trails.
//!
//! ## Modules
//!
//! - [`ledger`] — the capability trait, operation requests, audit effects
//! - [`memory`] — in-memory token ledger for tests

pub mod ledger;
pub mod memory;

use keel_types::{Address, TokenId};
use rust_decimal::Decimal;

/// Protocol-owned account that collects exchange fees.
pub const TREASURY_ADDRESS: &str = "treasury";

/// Error types for token-ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The source account cannot cover the requested amount.
    #[error(
        "insufficient {token} balance at {address}: requested {requested}, available {available}"
    )]
    InsufficientBalance {
        /// Token being moved or burned.
        token: TokenId,
        /// Account short of funds.
        address: Address,
        /// Amount the operation needed.
        requested: Decimal,
        /// Amount actually held.
        available: Decimal,
    },

    /// Operation amounts must be non-negative.
    #[error("amount must be non-negative, got {0}")]
    NegativeAmount(Decimal),

    /// Decimal range exhausted while crediting a balance.
    #[error("decimal overflow while updating a balance")]
    Overflow,

    /// The ledger failed or rejected the operation for a backend reason.
    #[error("token ledger backend error: {0}")]
    Backend(String),
}

/// Convenience result type for token-ledger operations.
pub type Result<T> = std::result::Result<T, TokenError>;
