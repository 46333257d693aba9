//! Fixed-pair convenience conversions.
//!
//! Thin wrappers over [`engine::exchange`] for the deployment's base and
//! stable tokens. A conversion runs in place: the same holder address is
//! debited and credited, and no fee is charged.

use keel_state::ledger::LedgerState;
use keel_token::ledger::TokenLedger;
use keel_types::requests::{ConvertRequest, ExchangeRequest};

use crate::config::ExchangeConfig;
use crate::engine::{self, ExchangeOutcome};
use crate::Result;

/// Convert part of the holder's base-token balance into the stable token.
///
/// # Errors
///
/// Same failure modes as [`engine::exchange`].
pub fn convert_base_to_stable(
    state: &mut dyn LedgerState,
    tokens: &mut dyn TokenLedger,
    config: &ExchangeConfig,
    request: &ConvertRequest,
) -> Result<ExchangeOutcome> {
    engine::exchange(
        state,
        tokens,
        config,
        &pair_request(config.base_token.clone(), config.stable_token.clone(), request),
    )
}

/// Convert part of the holder's stable-token balance back into the base
/// token.
///
/// # Errors
///
/// Same failure modes as [`engine::exchange`].
pub fn convert_stable_to_base(
    state: &mut dyn LedgerState,
    tokens: &mut dyn TokenLedger,
    config: &ExchangeConfig,
    request: &ConvertRequest,
) -> Result<ExchangeOutcome> {
    engine::exchange(
        state,
        tokens,
        config,
        &pair_request(config.stable_token.clone(), config.base_token.clone(), request),
    )
}

fn pair_request(
    token_from: String,
    token_to: String,
    request: &ConvertRequest,
) -> ExchangeRequest {
    ExchangeRequest {
        token_from,
        token_to,
        address_from: request.address.clone(),
        address_to: request.address.clone(),
        amount: request.amount,
        fees: Vec::new(),
    }
}
