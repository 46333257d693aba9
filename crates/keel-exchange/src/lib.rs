//! # keel-exchange
//!
//! Cross-token conversion engine for the Keel stablecoin module.
//!
//! A conversion prices both tokens from their current volume-weighted
//! bucket, deducts additive protocol fees into the treasury, burns the net
//! source amount, and mints the converted target amount:
//!
//! ```text
//! total_fee = sum(amount * fee_i)
//! net       = amount - total_fee
//! rate      = price_from / price_to
//! minted    = net * rate
//! ```
//!
//! The burn and the mint form one supply invariant and must commit
//! together. The engine never compensates a partial failure; it stops on
//! the first error and relies on the enclosing ledger transaction to abort
//! every effect already applied.
//!
//! ## Modules
//!
//! - [`config`] — deployment identities (token pair, treasury)
//! - [`fees`] — additive fee arithmetic
//! - [`engine`] — the conversion sequence
//! - [`convert`] — fixed-pair convenience operations

pub mod config;
pub mod convert;
pub mod engine;
pub mod fees;

use keel_types::TokenId;

/// Error types for exchange operations.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The request is malformed: non-positive amount, identical token pair,
    /// a fee rate outside `[0, 1)`, or fee rates summing to one or more.
    #[error("invalid exchange request: {0}")]
    InvalidRequest(String),

    /// The target token's aggregate price is zero, so no conversion rate
    /// exists.
    #[error("aggregate price for {token} is zero")]
    ZeroPrice {
        /// Token whose aggregate price collapsed to zero.
        token: TokenId,
    },

    /// Decimal range exhausted while computing amounts.
    #[error("decimal overflow while computing exchange amounts")]
    Overflow,

    /// The deployment configuration is unusable.
    #[error("invalid exchange config: {0}")]
    Config(String),

    /// Price lookup failed.
    #[error("oracle error: {0}")]
    Oracle(#[from] keel_oracle::OracleError),

    /// The token ledger rejected a movement.
    #[error("token ledger error: {0}")]
    Token(#[from] keel_token::TokenError),

    /// State-store access failed.
    #[error("state error: {0}")]
    State(#[from] keel_state::StateError),
}

/// Convenience result type for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;
