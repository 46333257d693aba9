//! Time-bucketed price/volume accumulation.
//!
//! Observations are grouped into fixed, non-overlapping windows per token:
//! a submission at time `t` under granularity `d` lands in the bucket
//! starting at `(t / d) * d`. Fixed windows bound the state read per
//! aggregation and give every observation a replay-stable key that does not
//! depend on submission order. Within one window the bucket keeps the
//! latest report per oracle address; a resubmission overwrites, it never
//! appends.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use keel_state::entity::StateEntity;
use keel_state::ledger::{composite_key, LedgerState};
use keel_types::requests::SubmitPriceRequest;
use keel_types::{Address, Timestamp, TokenId, DEFAULT_BUCKET_DURATION_SECS};

use crate::{OracleError, Result};

/// Accumulated observations for one `(token, window)` pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBucket {
    /// Token the observations refer to.
    pub token: TokenId,
    /// Duration-aligned start of the window.
    pub bucket_start: Timestamp,
    /// Window width in seconds.
    pub duration: u64,
    /// Latest reported price per oracle address.
    pub prices: BTreeMap<Address, Decimal>,
    /// Latest reported volume per oracle address. Written together with
    /// `prices`, so every address present there is present here too.
    pub volumes: BTreeMap<Address, Decimal>,
}

impl PriceBucket {
    /// Empty bucket for the window containing `date`.
    ///
    /// `duration` must be non-zero; the fallible entry points of this
    /// module validate that before constructing buckets.
    pub fn empty(token: TokenId, date: Timestamp, duration: u64) -> Self {
        Self {
            token,
            bucket_start: bucket_start_for(date, duration),
            duration,
            prices: BTreeMap::new(),
            volumes: BTreeMap::new(),
        }
    }

    /// Number of oracle addresses with an observation in this bucket.
    pub fn observation_count(&self) -> usize {
        self.prices.len()
    }
}

impl StateEntity for PriceBucket {
    fn state_key(&self) -> String {
        let start = self.bucket_start.to_string();
        let duration = self.duration.to_string();
        composite_key("prices", &[self.token.as_str(), start.as_str(), duration.as_str()])
    }
}

/// Duration-aligned floor of `date`.
///
/// `duration` must be non-zero.
pub fn bucket_start_for(date: Timestamp, duration: u64) -> Timestamp {
    (date / duration) * duration
}

/// Record one price/volume observation in the current bucket.
///
/// The bucket is the [`DEFAULT_BUCKET_DURATION_SECS`]-aligned window
/// containing the transaction timestamp. An earlier observation from the
/// same address in the same window is overwritten. The updated bucket is
/// persisted and returned.
///
/// Authorization is not checked here; the platform layer consults
/// [`crate::registry::is_allowed`] before invoking a submission.
///
/// # Errors
///
/// - [`OracleError::NegativePrice`] / [`OracleError::NegativeVolume`] for
///   negative observation values
/// - [`OracleError::State`] if the store access fails
pub fn submit_price(
    state: &mut dyn LedgerState,
    request: &SubmitPriceRequest,
) -> Result<PriceBucket> {
    if request.price < Decimal::ZERO {
        return Err(OracleError::NegativePrice(request.price));
    }
    if request.volume < Decimal::ZERO {
        return Err(OracleError::NegativeVolume(request.volume));
    }

    let observed_at = state.tx_timestamp()?;
    let mut bucket = PriceBucket::empty(
        request.token.clone(),
        observed_at,
        DEFAULT_BUCKET_DURATION_SECS,
    );

    // First observation of a window starts from the empty bucket; any later
    // one picks up the stored bucket.
    bucket.load_state(state)?;

    bucket.prices.insert(request.address.clone(), request.price);
    bucket.volumes.insert(request.address.clone(), request.volume);

    bucket.save_state(state)?;

    tracing::debug!(
        token = %bucket.token,
        address = %request.address,
        price = %request.price,
        volume = %request.volume,
        bucket_start = bucket.bucket_start,
        observations = bucket.observation_count(),
        "price observation recorded"
    );

    Ok(bucket)
}

/// Load the stored bucket for the window of `date` under `duration`.
///
/// `date` is aligned down with the same rule as submission, so any
/// timestamp inside a window addresses that window's bucket.
///
/// # Errors
///
/// - [`OracleError::ZeroDuration`]
/// - [`OracleError::NoPriceData`] if no bucket was ever stored there
/// - [`OracleError::State`] if the store access fails
pub fn load_bucket(
    state: &dyn LedgerState,
    token: &str,
    date: Timestamp,
    duration: u64,
) -> Result<PriceBucket> {
    if duration == 0 {
        return Err(OracleError::ZeroDuration);
    }

    let mut bucket = PriceBucket::empty(token.to_string(), date, duration);
    if !bucket.load_state(state)? {
        return Err(OracleError::NoPriceData {
            token: token.to_string(),
            bucket_start: bucket.bucket_start,
        });
    }

    Ok(bucket)
}
