//! Volume-weighted price aggregation.
//!
//! A bucket's price weights each oracle's latest observation by its
//! reported volume, so thinly-traded reports cannot dominate:
//!
//! ```text
//! VWAP = sum(price_i * volume_i) / sum(volume_i)
//! ```
//!
//! The sums run over the bucket's address mapping, so every reporter
//! contributes exactly once and the result is independent of submission
//! order.

use rust_decimal::Decimal;

use keel_state::ledger::LedgerState;
use keel_types::Timestamp;

use crate::bucket::{load_bucket, PriceBucket};
use crate::{OracleError, Result};

/// Volume-weighted average price of a bucket.
///
/// Pure aggregation over an already-loaded bucket; nothing here touches
/// the state store. A price entry with no matching volume entry
/// contributes zero weight.
///
/// # Errors
///
/// - [`OracleError::NoPriceData`] when the total volume is zero, the empty
///   bucket included; the division-by-zero condition surfaces as a typed
///   error, never as a bogus price
/// - [`OracleError::Overflow`] if the decimal range is exhausted
///
/// # Examples
///
/// ```
/// use keel_oracle::bucket::PriceBucket;
/// use keel_oracle::vwap::compute_vwap;
/// use rust_decimal_macros::dec;
///
/// let mut bucket = PriceBucket::empty("KEEL".to_string(), 0, 3600);
/// bucket.prices.insert("a".to_string(), dec!(1));
/// bucket.volumes.insert("a".to_string(), dec!(1));
/// bucket.prices.insert("b".to_string(), dec!(4));
/// bucket.volumes.insert("b".to_string(), dec!(3));
///
/// // (1*1 + 4*3) / (1 + 3)
/// assert_eq!(compute_vwap(&bucket).unwrap(), dec!(3.25));
/// ```
pub fn compute_vwap(bucket: &PriceBucket) -> Result<Decimal> {
    let mut weighted_sum = Decimal::ZERO;
    let mut total_volume = Decimal::ZERO;

    for (address, price) in &bucket.prices {
        let volume = bucket
            .volumes
            .get(address)
            .copied()
            .unwrap_or(Decimal::ZERO);

        let weighted = price.checked_mul(volume).ok_or(OracleError::Overflow)?;
        weighted_sum = weighted_sum
            .checked_add(weighted)
            .ok_or(OracleError::Overflow)?;
        total_volume = total_volume
            .checked_add(volume)
            .ok_or(OracleError::Overflow)?;
    }

    // Submissions validate sign, but a bucket is plain data; a zero or
    // negative total never reaches the division.
    if total_volume <= Decimal::ZERO {
        return Err(OracleError::NoPriceData {
            token: bucket.token.clone(),
            bucket_start: bucket.bucket_start,
        });
    }

    weighted_sum
        .checked_div(total_volume)
        .ok_or(OracleError::Overflow)
}

/// Volume-weighted price of `token` for the bucket containing `date`.
///
/// # Errors
///
/// - [`OracleError::ZeroDuration`]
/// - [`OracleError::NoPriceData`] if the bucket is absent or carries no
///   volume
/// - [`OracleError::State`] if the store access fails
pub fn get_price(
    state: &dyn LedgerState,
    token: &str,
    date: Timestamp,
    duration: u64,
) -> Result<Decimal> {
    let bucket = load_bucket(state, token, date, duration)?;
    let price = compute_vwap(&bucket)?;

    tracing::trace!(
        token = %bucket.token,
        bucket_start = bucket.bucket_start,
        observations = bucket.observation_count(),
        price = %price,
        "price aggregated"
    );

    Ok(price)
}
