//! # keel-oracle
//!
//! Oracle registry and volume-weighted price feeds for the Keel stablecoin
//! module.
//!
//! External reporters submit `(price, volume)` observations per token.
//! Observations are grouped into fixed, non-overlapping time buckets, and a
//! bucket's price is the volume-weighted average over the latest
//! observation of each reporting oracle:
//!
//! ```text
//! VWAP = sum(price_i * volume_i) / sum(volume_i)
//! ```
//!
//! Everything here runs inside one ledger transaction against the
//! [`keel_state::ledger::LedgerState`] capability; time always comes from
//! the transaction timestamp, never the wall clock.
//!
//! ## Modules
//!
//! - [`registry`] — oracle records and authorization state
//! - [`bucket`] — time-bucketed price/volume accumulation
//! - [`vwap`] — volume-weighted aggregation and price lookup

pub mod bucket;
pub mod registry;
pub mod vwap;

use keel_types::{Address, Timestamp, TokenId};
use rust_decimal::Decimal;

/// Error types for oracle operations.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The address already holds an oracle record.
    #[error("address {address} is already registered as an oracle")]
    AlreadyRegistered {
        /// The conflicting address.
        address: Address,
    },

    /// No oracle record exists for the address.
    #[error("address {address} is not registered as an oracle")]
    NotRegistered {
        /// The unknown address.
        address: Address,
    },

    /// No usable price data in the addressed bucket: the bucket is absent,
    /// or every observation in it carries zero volume.
    #[error("no price data for {token} in the bucket starting at {bucket_start}")]
    NoPriceData {
        /// Token whose price was requested.
        token: TokenId,
        /// Aligned start of the addressed bucket.
        bucket_start: Timestamp,
    },

    /// Bucket durations must be non-zero.
    #[error("bucket duration must be non-zero")]
    ZeroDuration,

    /// Reported prices must be non-negative.
    #[error("price must be non-negative, got {0}")]
    NegativePrice(Decimal),

    /// Reported volumes must be non-negative.
    #[error("volume must be non-negative, got {0}")]
    NegativeVolume(Decimal),

    /// Decimal range exhausted while aggregating.
    #[error("decimal overflow while aggregating prices")]
    Overflow,

    /// State-store access failed.
    #[error("state error: {0}")]
    State(#[from] keel_state::StateError),
}

/// Convenience result type for oracle operations.
pub type Result<T> = std::result::Result<T, OracleError>;
