//! # keel-types
//!
//! Shared domain types for the Keel stablecoin module.
//!
//! Every crate in the workspace speaks in terms of these aliases, constants,
//! and request shapes. Amounts, prices, volumes, and fee rates are always
//! [`rust_decimal::Decimal`]; timestamps and durations are Unix epoch
//! seconds.
//!
//! ## Modules
//!
//! - [`requests`] — request shapes for the module's caller-facing operations

pub mod requests;

use serde::{Deserialize, Serialize};

/// External account identity, as issued by the surrounding ledger platform.
pub type Address = String;

/// Token identifier (e.g. `"KEEL"`, `"KUSD"`).
pub type TokenId = String;

/// Unix epoch seconds, as reported by the ledger transaction context.
pub type Timestamp = u64;

/// System-wide price bucket granularity in seconds (one hour).
///
/// Submissions and exchange-time lookups must agree on a single granularity
/// to address the same buckets, so this is a module constant rather than
/// per-deployment configuration.
pub const DEFAULT_BUCKET_DURATION_SECS: u64 = 3600;

/// Base token of the fixed conversion pair.
pub const BASE_TOKEN: &str = "KEEL";

/// Stable token of the fixed conversion pair.
pub const STABLE_TOKEN: &str = "KUSD";

/// Authorization state of a registered oracle.
///
/// The registry records the state; enforcement happens in the platform
/// layer, which consults it before honoring a price submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleState {
    /// Price submissions from this address should be honored.
    Allowed,
    /// Price submissions from this address should be ignored.
    Disallowed,
}
