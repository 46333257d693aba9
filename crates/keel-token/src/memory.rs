//! In-memory token ledger for tests.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use keel_types::{Address, TokenId};

use crate::ledger::{
    BurnRequest, Effect, EffectKind, MintRequest, TokenLedger, TransferRequest,
};
use crate::{Result, TokenError};

/// An in-memory [`TokenLedger`] enforcing the full capability contract.
///
/// Balances live in a plain map keyed by `(address, token)`. `Clone` lets
/// a test checkpoint the ledger before an operation and restore it
/// afterwards, emulating the platform-level abort of a failed transaction.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenLedger {
    balances: BTreeMap<(Address, TokenId), Decimal>,
}

impl MemoryTokenLedger {
    /// Empty ledger with no balances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `address` with `amount` of `token`, on top of whatever it
    /// already holds.
    ///
    /// # Arguments
    ///
    /// * `address` - Account to credit
    /// * `token` - Token identifier
    /// * `amount` - Non-negative amount to add
    ///
    /// # Errors
    ///
    /// - [`TokenError::NegativeAmount`]
    /// - [`TokenError::Overflow`]
    pub fn credit(&mut self, address: &str, token: &str, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(TokenError::NegativeAmount(amount));
        }
        let credited = self
            .balance_of(address, token)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances
            .insert((address.to_string(), token.to_string()), credited);
        Ok(())
    }

    /// Current balance of `token` at `address`; zero when never touched.
    pub fn balance_of(&self, address: &str, token: &str) -> Decimal {
        self.balances
            .get(&(address.to_string(), token.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Total supply of `token` across all accounts.
    pub fn total_supply(&self, token: &str) -> Decimal {
        self.balances
            .iter()
            .filter(|((_, held), _)| held == token)
            .fold(Decimal::ZERO, |sum, (_, amount)| sum + *amount)
    }

    fn debit(&mut self, address: &str, token: &str, amount: Decimal) -> Result<()> {
        let available = self.balance_of(address, token);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                token: token.to_string(),
                address: address.to_string(),
                requested: amount,
                available,
            });
        }
        self.balances
            .insert((address.to_string(), token.to_string()), available - amount);
        Ok(())
    }
}

impl TokenLedger for MemoryTokenLedger {
    fn transfer(&mut self, request: TransferRequest) -> Result<Effect> {
        if request.amount < Decimal::ZERO {
            return Err(TokenError::NegativeAmount(request.amount));
        }

        if request.from == request.to {
            // Self-transfers leave balances untouched but still need the
            // sufficiency check.
            let available = self.balance_of(&request.from, &request.token);
            if available < request.amount {
                return Err(TokenError::InsufficientBalance {
                    token: request.token.clone(),
                    address: request.from.clone(),
                    requested: request.amount,
                    available,
                });
            }
        } else {
            // Checked before either side mutates, so a failed transfer
            // cannot leave a half-applied movement behind.
            let credited = self
                .balance_of(&request.to, &request.token)
                .checked_add(request.amount)
                .ok_or(TokenError::Overflow)?;
            self.debit(&request.from, &request.token, request.amount)?;
            self.balances
                .insert((request.to.clone(), request.token.clone()), credited);
        }

        Ok(Effect {
            kind: EffectKind::Transfer,
            op_type: request.op_type,
            token: request.token,
            from: Some(request.from),
            to: Some(request.to),
            amount: request.amount,
        })
    }

    fn burn(&mut self, request: BurnRequest) -> Result<Effect> {
        if request.amount < Decimal::ZERO {
            return Err(TokenError::NegativeAmount(request.amount));
        }
        self.debit(&request.from, &request.token, request.amount)?;

        Ok(Effect {
            kind: EffectKind::Burn,
            op_type: request.op_type,
            token: request.token,
            from: Some(request.from),
            to: None,
            amount: request.amount,
        })
    }

    fn mint(&mut self, request: MintRequest) -> Result<Effect> {
        if request.amount < Decimal::ZERO {
            return Err(TokenError::NegativeAmount(request.amount));
        }
        self.credit(&request.to, &request.token, request.amount)?;

        Ok(Effect {
            kind: EffectKind::Mint,
            op_type: request.op_type,
            token: request.token,
            from: None,
            to: Some(request.to),
            amount: request.amount,
        })
    }

    fn check_balance(&self, address: &str, token: &str, amount: Decimal) -> Result<bool> {
        if amount < Decimal::ZERO {
            return Err(TokenError::NegativeAmount(amount));
        }
        Ok(self.balance_of(address, token) >= amount)
    }
}
