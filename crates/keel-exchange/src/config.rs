//! Deployment identities for the exchange engine.
//!
//! Only identities live here: which two tokens form the fixed conversion
//! pair and which account collects fees. The bucket granularity is a
//! module constant, not configuration, because submissions and lookups
//! must agree on it to address the same buckets.

use serde::{Deserialize, Serialize};

use keel_token::TREASURY_ADDRESS;
use keel_types::{Address, TokenId, BASE_TOKEN, STABLE_TOKEN};

use crate::{ExchangeError, Result};

/// Token pair and treasury identities for one deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Base token of the fixed conversion pair.
    #[serde(default = "default_base_token")]
    pub base_token: TokenId,
    /// Stable token of the fixed conversion pair.
    #[serde(default = "default_stable_token")]
    pub stable_token: TokenId,
    /// Protocol-owned account that collects exchange fees.
    #[serde(default = "default_treasury")]
    pub treasury: Address,
}

fn default_base_token() -> TokenId {
    BASE_TOKEN.to_string()
}

fn default_stable_token() -> TokenId {
    STABLE_TOKEN.to_string()
}

fn default_treasury() -> Address {
    TREASURY_ADDRESS.to_string()
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_token: default_base_token(),
            stable_token: default_stable_token(),
            treasury: default_treasury(),
        }
    }
}

impl ExchangeConfig {
    /// Parse a config from TOML, falling back to the defaults for absent
    /// keys, and validate it.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::Config`] if the TOML does not parse or the result
    ///   fails [`validate`](Self::validate)
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ExchangeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the identities are usable.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::Config`] for an empty identity or an identical
    ///   base/stable pair
    pub fn validate(&self) -> Result<()> {
        if self.base_token.is_empty() || self.stable_token.is_empty() {
            return Err(ExchangeError::Config(
                "token identifiers must be non-empty".to_string(),
            ));
        }
        if self.treasury.is_empty() {
            return Err(ExchangeError::Config(
                "treasury address must be non-empty".to_string(),
            ));
        }
        if self.base_token == self.stable_token {
            return Err(ExchangeError::Config(format!(
                "base and stable tokens must differ, both are {}",
                self.base_token
            )));
        }
        Ok(())
    }
}
