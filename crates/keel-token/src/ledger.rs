//! The token-ledger capability: transfers, burns, mints, audit effects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use keel_types::{Address, TokenId};

use crate::Result;

/// Move value between two accounts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Audit label for the movement (e.g. `exchange_fee_KEEL_KUSD`).
    pub op_type: String,
    /// Token being moved.
    pub token: TokenId,
    /// Debited account.
    pub from: Address,
    /// Credited account.
    pub to: Address,
    /// Amount to move. Non-negative; zero-amount transfers succeed.
    pub amount: Decimal,
}

/// Destroy supply held by an account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BurnRequest {
    /// Audit label for the burn (e.g. `burn_convert_KEEL_KUSD`).
    pub op_type: String,
    /// Token being destroyed.
    pub token: TokenId,
    /// Account whose balance is destroyed.
    pub from: Address,
    /// Amount to destroy. Non-negative.
    pub amount: Decimal,
}

/// Create supply at an account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MintRequest {
    /// Audit label for the mint (e.g. `mint_convert_KEEL_KUSD`).
    pub op_type: String,
    /// Token being created.
    pub token: TokenId,
    /// Account receiving the new supply.
    pub to: Address,
    /// Amount to create. Non-negative.
    pub amount: Decimal,
}

/// Kind of mutation an [`Effect`] records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Balance moved between two accounts; supply unchanged.
    Transfer,
    /// Supply destroyed at an account.
    Burn,
    /// Supply created at an account.
    Mint,
}

/// Append-only audit record of one completed ledger operation.
///
/// Effects are emitted in execution order and never rewritten; a composite
/// operation reports all of its effects together so downstream consumers
/// see the full movement of value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// What happened.
    pub kind: EffectKind,
    /// Audit label carried over from the request.
    pub op_type: String,
    /// Token affected.
    pub token: TokenId,
    /// Debited account. Absent for mints.
    pub from: Option<Address>,
    /// Credited account. Absent for burns.
    pub to: Option<Address>,
    /// Amount moved, destroyed, or created.
    pub amount: Decimal,
}

/// Balance ledger with supply-adjustment primitives.
///
/// Implementations own balance storage and its integrity rules: `transfer`
/// and `burn` must reject amounts the source account cannot cover, and all
/// three mutations must reject negative amounts. Callers rely on those
/// checks instead of pre-checking balances themselves. Zero amounts
/// succeed and still produce an effect.
pub trait TokenLedger {
    /// Move `request.amount` of a token between two accounts.
    ///
    /// # Errors
    ///
    /// - [`TokenError::NegativeAmount`](crate::TokenError::NegativeAmount)
    /// - [`TokenError::InsufficientBalance`](crate::TokenError::InsufficientBalance)
    fn transfer(&mut self, request: TransferRequest) -> Result<Effect>;

    /// Destroy `request.amount` of a token at the source account.
    ///
    /// # Errors
    ///
    /// - [`TokenError::NegativeAmount`](crate::TokenError::NegativeAmount)
    /// - [`TokenError::InsufficientBalance`](crate::TokenError::InsufficientBalance)
    fn burn(&mut self, request: BurnRequest) -> Result<Effect>;

    /// Create `request.amount` of a token at the target account.
    ///
    /// # Errors
    ///
    /// - [`TokenError::NegativeAmount`](crate::TokenError::NegativeAmount)
    fn mint(&mut self, request: MintRequest) -> Result<Effect>;

    /// Whether `address` holds at least `amount` of `token`.
    ///
    /// # Errors
    ///
    /// - [`TokenError::NegativeAmount`](crate::TokenError::NegativeAmount)
    fn check_balance(&self, address: &str, token: &str, amount: Decimal) -> Result<bool>;
}
