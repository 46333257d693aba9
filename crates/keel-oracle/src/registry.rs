//! Oracle registry: who may report prices.
//!
//! An oracle is an external price reporter identified by its ledger
//! address. The registry only records each oracle's authorization state;
//! the platform layer consults [`is_allowed`] before honoring a submission,
//! so the submission path itself stays policy-free.

use serde::{Deserialize, Serialize};

use keel_state::entity::StateEntity;
use keel_state::ledger::{composite_key, LedgerState};
use keel_types::requests::{RegisterOracleRequest, UpdateOracleStateRequest};
use keel_types::{Address, OracleState};

use crate::{OracleError, Result};

/// A registered price reporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oracle {
    /// Ledger address identifying the oracle. Immutable once registered.
    pub address: Address,
    /// Authorization state.
    pub state: OracleState,
    /// Display label.
    pub name: String,
}

impl StateEntity for Oracle {
    fn state_key(&self) -> String {
        composite_key("oracle", &[self.address.as_str()])
    }
}

/// Register a new oracle in the `Allowed` state.
///
/// The record is persisted immediately and returned.
///
/// # Errors
///
/// - [`OracleError::AlreadyRegistered`] if the address holds a record
/// - [`OracleError::State`] if the store access fails
pub fn register_oracle(
    state: &mut dyn LedgerState,
    request: &RegisterOracleRequest,
) -> Result<Oracle> {
    let mut oracle = Oracle {
        address: request.address.clone(),
        state: OracleState::Allowed,
        name: request.name.clone(),
    };

    if oracle.load_state(state)? {
        return Err(OracleError::AlreadyRegistered {
            address: request.address.clone(),
        });
    }

    oracle.save_state(state)?;

    tracing::info!(address = %oracle.address, name = %oracle.name, "oracle registered");

    Ok(oracle)
}

/// Load the oracle record for `address`.
///
/// # Errors
///
/// - [`OracleError::NotRegistered`] if no record exists
/// - [`OracleError::State`] if the store access fails
pub fn lookup_oracle(state: &dyn LedgerState, address: &str) -> Result<Oracle> {
    let mut oracle = Oracle {
        address: address.to_string(),
        state: OracleState::Allowed,
        name: String::new(),
    };

    if !oracle.load_state(state)? {
        return Err(OracleError::NotRegistered {
            address: address.to_string(),
        });
    }

    Ok(oracle)
}

/// Overwrite the authorization state of an existing oracle, preserving its
/// name.
///
/// # Errors
///
/// - [`OracleError::NotRegistered`] if no record exists for the address
/// - [`OracleError::State`] if the store access fails
pub fn update_oracle_state(
    state: &mut dyn LedgerState,
    request: &UpdateOracleStateRequest,
) -> Result<Oracle> {
    let mut oracle = lookup_oracle(state, &request.address)?;
    oracle.state = request.state;
    oracle.save_state(state)?;

    tracing::info!(address = %oracle.address, state = ?oracle.state, "oracle state updated");

    Ok(oracle)
}

/// Whether price submissions from `address` should be honored.
///
/// # Errors
///
/// - [`OracleError::NotRegistered`] if no record exists
/// - [`OracleError::State`] if the store access fails
pub fn is_allowed(state: &dyn LedgerState, address: &str) -> Result<bool> {
    Ok(lookup_oracle(state, address)?.state == OracleState::Allowed)
}
