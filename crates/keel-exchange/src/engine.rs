//! The conversion sequence.
//!
//! One exchange runs inside one ledger transaction, in a fixed order:
//!
//! 1. validate the request and compute the additive fee
//! 2. transfer the fee from the holder to the treasury
//! 3. price both tokens from the bucket containing the transaction
//!    timestamp
//! 4. burn the net source amount
//! 5. mint `net * rate` of the target token
//!
//! Any failure stops the sequence with a typed error. Effects already
//! applied are rolled back by the platform's transaction abort, never
//! compensated here; that is what keeps a committed burn from outliving a
//! failed mint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use keel_oracle::vwap::get_price;
use keel_state::ledger::LedgerState;
use keel_token::ledger::{BurnRequest, Effect, MintRequest, TokenLedger, TransferRequest};
use keel_types::requests::ExchangeRequest;
use keel_types::DEFAULT_BUCKET_DURATION_SECS;

use crate::config::ExchangeConfig;
use crate::fees;
use crate::{ExchangeError, Result};

/// Composed result of one conversion.
///
/// Carries the full audit trail plus the intermediate figures, so the
/// platform layer can emit events without recomputing anything.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    /// Fee transfer, burn, and mint effects, in execution order.
    pub effects: Vec<Effect>,
    /// Fee deducted from the pre-fee amount.
    pub total_fee: Decimal,
    /// Amount actually converted after the fee deduction.
    pub net_amount: Decimal,
    /// Conversion rate `price_from / price_to` at execution time.
    pub rate: Decimal,
    /// Amount created on the target token.
    pub minted: Decimal,
}

/// Convert `amount` of `token_from` held by `address_from` into `token_to`
/// credited to `address_to`, deducting the request's additive fees.
///
/// Both tokens are priced from the bucket containing the current
/// transaction timestamp, at the system bucket granularity. Balance
/// sufficiency is enforced by the token ledger inside the fee transfer and
/// the burn; there is no separate pre-check.
///
/// # Errors
///
/// - [`ExchangeError::InvalidRequest`] for a non-positive amount, an
///   identical token pair, or a bad fee schedule
/// - [`ExchangeError::Oracle`] when either token has no usable price in
///   the current bucket
/// - [`ExchangeError::ZeroPrice`] when the target token prices at zero
/// - [`ExchangeError::Token`] when the fee transfer or the burn exceeds
///   the holder's balance
pub fn exchange(
    state: &mut dyn LedgerState,
    tokens: &mut dyn TokenLedger,
    config: &ExchangeConfig,
    request: &ExchangeRequest,
) -> Result<ExchangeOutcome> {
    validate_request(request)?;

    let total_fee = fees::total_fee(request.amount, &request.fees)?;

    // The fee moves even when zero, so every exchange leaves a uniform
    // audit trail of exactly three effects.
    let fee_effect = tokens.transfer(TransferRequest {
        op_type: format!("exchange_fee_{}_{}", request.token_from, request.token_to),
        token: request.token_from.clone(),
        from: request.address_from.clone(),
        to: config.treasury.clone(),
        amount: total_fee,
    })?;

    let net_amount = request
        .amount
        .checked_sub(total_fee)
        .ok_or(ExchangeError::Overflow)?;

    // Both sides are priced in the window of the transaction timestamp.
    let now = state.tx_timestamp()?;
    let price_from = get_price(state, &request.token_from, now, DEFAULT_BUCKET_DURATION_SECS)?;
    let price_to = get_price(state, &request.token_to, now, DEFAULT_BUCKET_DURATION_SECS)?;

    if price_to.is_zero() {
        return Err(ExchangeError::ZeroPrice {
            token: request.token_to.clone(),
        });
    }
    let rate = price_from
        .checked_div(price_to)
        .ok_or(ExchangeError::Overflow)?;

    let burn_effect = tokens.burn(BurnRequest {
        op_type: format!("burn_convert_{}_{}", request.token_from, request.token_to),
        token: request.token_from.clone(),
        from: request.address_from.clone(),
        amount: net_amount,
    })?;

    let minted = net_amount
        .checked_mul(rate)
        .ok_or(ExchangeError::Overflow)?;

    let mint_effect = tokens.mint(MintRequest {
        op_type: format!("mint_convert_{}_{}", request.token_from, request.token_to),
        token: request.token_to.clone(),
        to: request.address_to.clone(),
        amount: minted,
    })?;

    tracing::info!(
        token_from = %request.token_from,
        token_to = %request.token_to,
        amount = %request.amount,
        total_fee = %total_fee,
        rate = %rate,
        minted = %minted,
        "exchange completed"
    );

    Ok(ExchangeOutcome {
        effects: vec![fee_effect, burn_effect, mint_effect],
        total_fee,
        net_amount,
        rate,
        minted,
    })
}

fn validate_request(request: &ExchangeRequest) -> Result<()> {
    if request.amount <= Decimal::ZERO {
        return Err(ExchangeError::InvalidRequest(format!(
            "amount must be positive, got {}",
            request.amount
        )));
    }
    if request.token_from == request.token_to {
        return Err(ExchangeError::InvalidRequest(format!(
            "conversion requires two distinct tokens, got {} on both sides",
            request.token_from
        )));
    }
    fees::validate_fees(&request.fees)
}

#[cfg(test)]
mod tests {
    use keel_state::memory::MemoryLedger;
    use keel_token::ledger::EffectKind;
    use keel_token::memory::MemoryTokenLedger;
    use keel_types::requests::SubmitPriceRequest;
    use rust_decimal_macros::dec;

    use super::*;

    const NOW: u64 = 1_700_000_000;

    /// State with one oracle report per token: KEEL at 2, KUSD at 4.
    fn priced_state() -> MemoryLedger {
        let mut state = MemoryLedger::at_time(NOW);
        submit(&mut state, "KEEL", dec!(2));
        submit(&mut state, "KUSD", dec!(4));
        state
    }

    fn submit(state: &mut MemoryLedger, token: &str, price: Decimal) {
        keel_oracle::bucket::submit_price(
            state,
            &SubmitPriceRequest {
                token: token.to_string(),
                address: "reporter".to_string(),
                price,
                volume: dec!(1000),
            },
        )
        .expect("submit");
    }

    fn request(amount: Decimal, fees: &[Decimal]) -> ExchangeRequest {
        ExchangeRequest {
            token_from: "KEEL".to_string(),
            token_to: "KUSD".to_string(),
            address_from: "alice".to_string(),
            address_to: "bob".to_string(),
            amount,
            fees: fees.to_vec(),
        }
    }

    #[test]
    fn test_exchange_full_arithmetic() {
        let mut state = priced_state();
        let mut tokens = MemoryTokenLedger::new();
        tokens.credit("alice", "KEEL", dec!(100)).expect("credit");

        let outcome = exchange(
            &mut state,
            &mut tokens,
            &ExchangeConfig::default(),
            &request(dec!(100), &[dec!(0.01), dec!(0.02)]),
        )
        .expect("exchange");

        // fee 3, net 97, rate 2/4, minted 48.5
        assert_eq!(outcome.total_fee, dec!(3));
        assert_eq!(outcome.net_amount, dec!(97));
        assert_eq!(outcome.rate, dec!(0.5));
        assert_eq!(outcome.minted, dec!(48.5));

        assert_eq!(tokens.balance_of("alice", "KEEL"), dec!(0));
        assert_eq!(tokens.balance_of("treasury", "KEEL"), dec!(3));
        assert_eq!(tokens.balance_of("bob", "KUSD"), dec!(48.5));

        // Only the fee remains in KEEL supply; the net amount was burned.
        assert_eq!(tokens.total_supply("KEEL"), dec!(3));
        assert_eq!(tokens.total_supply("KUSD"), dec!(48.5));
    }

    #[test]
    fn test_exchange_reports_three_effects_in_order() {
        let mut state = priced_state();
        let mut tokens = MemoryTokenLedger::new();
        tokens.credit("alice", "KEEL", dec!(100)).expect("credit");

        let outcome = exchange(
            &mut state,
            &mut tokens,
            &ExchangeConfig::default(),
            &request(dec!(100), &[dec!(0.01)]),
        )
        .expect("exchange");

        let kinds: Vec<EffectKind> = outcome.effects.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EffectKind::Transfer, EffectKind::Burn, EffectKind::Mint]
        );
        assert_eq!(outcome.effects[0].op_type, "exchange_fee_KEEL_KUSD");
        assert_eq!(outcome.effects[1].op_type, "burn_convert_KEEL_KUSD");
        assert_eq!(outcome.effects[2].op_type, "mint_convert_KEEL_KUSD");
        assert_eq!(outcome.effects[2].to.as_deref(), Some("bob"));
    }

    #[test]
    fn test_exchange_without_fees_still_transfers_zero() {
        let mut state = priced_state();
        let mut tokens = MemoryTokenLedger::new();
        tokens.credit("alice", "KEEL", dec!(10)).expect("credit");

        let outcome = exchange(
            &mut state,
            &mut tokens,
            &ExchangeConfig::default(),
            &request(dec!(10), &[]),
        )
        .expect("exchange");

        assert_eq!(outcome.total_fee, dec!(0));
        assert_eq!(outcome.effects.len(), 3);
        assert_eq!(outcome.effects[0].kind, EffectKind::Transfer);
        assert_eq!(outcome.effects[0].amount, dec!(0));
        assert_eq!(outcome.minted, dec!(5));
    }

    #[test]
    fn test_exchange_rejects_non_positive_amount() {
        let mut state = priced_state();
        let mut tokens = MemoryTokenLedger::new();

        for amount in [dec!(0), dec!(-5)] {
            let err = exchange(
                &mut state,
                &mut tokens,
                &ExchangeConfig::default(),
                &request(amount, &[]),
            )
            .expect_err("must fail");
            assert!(matches!(err, ExchangeError::InvalidRequest(_)));
        }
    }

    #[test]
    fn test_exchange_rejects_identical_token_pair() {
        let mut state = priced_state();
        let mut tokens = MemoryTokenLedger::new();

        let mut bad = request(dec!(10), &[]);
        bad.token_to = "KEEL".to_string();
        let err = exchange(&mut state, &mut tokens, &ExchangeConfig::default(), &bad)
            .expect_err("must fail");
        assert!(matches!(err, ExchangeError::InvalidRequest(_)));
    }

    #[test]
    fn test_exchange_rejects_fees_consuming_the_amount() {
        let mut state = priced_state();
        let mut tokens = MemoryTokenLedger::new();
        tokens.credit("alice", "KEEL", dec!(100)).expect("credit");

        let err = exchange(
            &mut state,
            &mut tokens,
            &ExchangeConfig::default(),
            &request(dec!(100), &[dec!(0.6), dec!(0.4)]),
        )
        .expect_err("must fail");
        assert!(matches!(err, ExchangeError::InvalidRequest(_)));

        // Rejected before any movement.
        assert_eq!(tokens.balance_of("alice", "KEEL"), dec!(100));
    }

    #[test]
    fn test_exchange_fails_without_price_data() {
        let mut state = MemoryLedger::at_time(NOW);
        submit(&mut state, "KEEL", dec!(2));
        // No KUSD observations at all.
        let mut tokens = MemoryTokenLedger::new();
        tokens.credit("alice", "KEEL", dec!(10)).expect("credit");

        let err = exchange(
            &mut state,
            &mut tokens,
            &ExchangeConfig::default(),
            &request(dec!(10), &[]),
        )
        .expect_err("must fail");
        assert!(matches!(
            err,
            ExchangeError::Oracle(keel_oracle::OracleError::NoPriceData { .. })
        ));
    }

    #[test]
    fn test_exchange_prices_from_the_current_window_only() {
        // Observations live in the window of NOW; an exchange one window
        // later must not see them.
        let mut state = priced_state();
        state.set_tx_time(NOW + keel_types::DEFAULT_BUCKET_DURATION_SECS);
        let mut tokens = MemoryTokenLedger::new();
        tokens.credit("alice", "KEEL", dec!(10)).expect("credit");

        let err = exchange(
            &mut state,
            &mut tokens,
            &ExchangeConfig::default(),
            &request(dec!(10), &[]),
        )
        .expect_err("stale window");
        assert!(matches!(
            err,
            ExchangeError::Oracle(keel_oracle::OracleError::NoPriceData { .. })
        ));
    }

    #[test]
    fn test_exchange_fails_on_zero_target_price_before_burning() {
        let mut state = MemoryLedger::at_time(NOW);
        submit(&mut state, "KEEL", dec!(2));
        submit(&mut state, "KUSD", dec!(0));
        let mut tokens = MemoryTokenLedger::new();
        tokens.credit("alice", "KEEL", dec!(10)).expect("credit");

        let err = exchange(
            &mut state,
            &mut tokens,
            &ExchangeConfig::default(),
            &request(dec!(10), &[]),
        )
        .expect_err("zero price");
        assert!(matches!(err, ExchangeError::ZeroPrice { token } if token == "KUSD"));

        // The rate failed before the burn, so the holder still has the
        // net amount; the platform abort would also revert the zero fee
        // transfer.
        assert_eq!(tokens.balance_of("alice", "KEEL"), dec!(10));
        assert_eq!(tokens.total_supply("KEEL"), dec!(10));
    }

    #[test]
    fn test_exchange_propagates_insufficient_balance() {
        let mut state = priced_state();
        let mut tokens = MemoryTokenLedger::new();
        tokens.credit("alice", "KEEL", dec!(50)).expect("credit");

        let err = exchange(
            &mut state,
            &mut tokens,
            &ExchangeConfig::default(),
            &request(dec!(100), &[]),
        )
        .expect_err("must fail");
        assert!(matches!(
            err,
            ExchangeError::Token(keel_token::TokenError::InsufficientBalance { .. })
        ));
        // The burn failed, so the mint never ran.
        assert_eq!(tokens.total_supply("KUSD"), dec!(0));
    }

    #[test]
    fn test_exchange_runs_in_the_reverse_direction() {
        let mut state = priced_state();
        let mut tokens = MemoryTokenLedger::new();
        tokens.credit("bob", "KUSD", dec!(48.5)).expect("credit");

        let mut reverse = request(dec!(48.5), &[]);
        reverse.token_from = "KUSD".to_string();
        reverse.token_to = "KEEL".to_string();
        reverse.address_from = "bob".to_string();
        reverse.address_to = "alice".to_string();

        let outcome = exchange(
            &mut state,
            &mut tokens,
            &ExchangeConfig::default(),
            &reverse,
        )
        .expect("exchange");

        // rate 4/2 = 2
        assert_eq!(outcome.rate, dec!(2));
        assert_eq!(outcome.minted, dec!(97));
        assert_eq!(tokens.balance_of("alice", "KEEL"), dec!(97));
    }
}
