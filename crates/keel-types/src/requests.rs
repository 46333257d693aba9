//! Request shapes for the module's caller-facing operations.
//!
//! These are transport-independent: the surrounding platform decodes its
//! wire format into one of these structs before invoking an operation, and
//! all identity and authorization concerns stay on the platform side.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, OracleState, TokenId};

/// Register a new price oracle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterOracleRequest {
    /// Ledger address to register. Must not already hold an oracle record.
    pub address: Address,
    /// Display label for the oracle.
    pub name: String,
}

/// Change the authorization state of an existing oracle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOracleStateRequest {
    /// Address of the oracle to update.
    pub address: Address,
    /// New authorization state.
    pub state: OracleState,
}

/// Record one price/volume observation for a token.
///
/// The observation lands in the bucket containing the current transaction
/// timestamp; callers never supply an observation time of their own.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmitPriceRequest {
    /// Token the observation refers to.
    pub token: TokenId,
    /// Reporting oracle's address.
    pub address: Address,
    /// Observed price. Non-negative.
    pub price: Decimal,
    /// Observed trading volume backing the price. Non-negative.
    pub volume: Decimal,
}

/// Convert an amount of one token into another at the current bucket rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    /// Token to convert out of.
    pub token_from: TokenId,
    /// Token to convert into. Must differ from `token_from`.
    pub token_to: TokenId,
    /// Account debited for the fee and the burned net amount.
    pub address_from: Address,
    /// Account credited with the minted target amount.
    pub address_to: Address,
    /// Pre-fee amount to convert. Strictly positive.
    pub amount: Decimal,
    /// Additive fee rates, each applied to the pre-fee amount. May be empty.
    #[serde(default)]
    pub fees: Vec<Decimal>,
}

/// Convert in place between the deployment's fixed token pair.
///
/// Both sides of the conversion use the same holder address, and no fee is
/// charged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertRequest {
    /// Holder whose balance is converted.
    pub address: Address,
    /// Amount to convert. Strictly positive.
    pub amount: Decimal,
}
