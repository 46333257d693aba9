//! Additive protocol fee arithmetic.
//!
//! Each fee rate applies independently to the original pre-fee amount and
//! the parts are summed. Fees are never compounded on a shrinking base:
//!
//! ```text
//! total_fee = sum(amount * fee_i)
//! ```

use rust_decimal::Decimal;

use crate::{ExchangeError, Result};

/// Validate a fee schedule: every rate in `[0, 1)`, and the rates summing
/// below one so the net amount stays positive.
///
/// The empty schedule is valid.
///
/// # Errors
///
/// - [`ExchangeError::InvalidRequest`] for an out-of-range rate or a
///   schedule that would consume the whole amount
pub fn validate_fees(fees: &[Decimal]) -> Result<()> {
    let mut sum = Decimal::ZERO;
    for fee in fees {
        if *fee < Decimal::ZERO || *fee >= Decimal::ONE {
            return Err(ExchangeError::InvalidRequest(format!(
                "fee rate {fee} is outside [0, 1)"
            )));
        }
        sum = sum.checked_add(*fee).ok_or(ExchangeError::Overflow)?;
    }
    if sum >= Decimal::ONE {
        return Err(ExchangeError::InvalidRequest(format!(
            "fee rates sum to {sum}, leaving nothing to convert"
        )));
    }
    Ok(())
}

/// Total fee for `amount` under a schedule of additive rates.
///
/// The empty schedule costs zero. Rates are assumed validated by
/// [`validate_fees`].
///
/// # Errors
///
/// - [`ExchangeError::Overflow`] if the decimal range is exhausted
///
/// # Examples
///
/// ```
/// use keel_exchange::fees::total_fee;
/// use rust_decimal_macros::dec;
///
/// // Each rate applies to the original amount: 1 + 2, not 1 + 1.98.
/// let fee = total_fee(dec!(100), &[dec!(0.01), dec!(0.02)]).unwrap();
/// assert_eq!(fee, dec!(3));
/// ```
pub fn total_fee(amount: Decimal, fees: &[Decimal]) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for fee in fees {
        let part = amount.checked_mul(*fee).ok_or(ExchangeError::Overflow)?;
        total = total.checked_add(part).ok_or(ExchangeError::Overflow)?;
    }
    Ok(total)
}
