//! The external asset ledger seam.
//!
//! Tokens are owned and mutated outside the exchange core. The core sees
//! them through [`AssetLedger`], the usual transfer / allowance / balance
//! surface of a fungible token, and never touches token state directly.

use std::collections::{HashMap, HashSet};

use escrowdex_types::{Asset, ExchangeError, Result, UserId};
use rust_decimal::Decimal;

/// A fungible-token ledger, one balance table per asset.
pub trait AssetLedger {
    /// `owner`'s balance of `asset`.
    fn balance_of(&self, asset: &str, owner: UserId) -> Decimal;

    /// How much of `owner`'s `asset` `spender` may move.
    fn allowance(&self, asset: &str, owner: UserId, spender: UserId) -> Decimal;

    /// Move `amount` from `from` to `to`, consuming `spender`'s allowance.
    fn transfer_from(
        &mut self,
        asset: &str,
        spender: UserId,
        from: UserId,
        to: UserId,
        amount: Decimal,
    ) -> Result<()>;

    /// Move `amount` of `from`'s own funds to `to`.
    fn transfer(&mut self, asset: &str, from: UserId, to: UserId, amount: Decimal) -> Result<()>;
}

/// In-memory [`AssetLedger`] for simulations and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetLedger {
    balances: HashMap<(Asset, UserId), Decimal>,
    allowances: HashMap<(Asset, UserId, UserId), Decimal>,
    /// Assets whose transfers are currently rejected.
    paused: HashSet<Asset>,
}

impl MemoryAssetLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` of `asset` out of thin air for `to`.
    pub fn mint(&mut self, asset: &str, to: UserId, amount: Decimal) {
        *self
            .balances
            .entry((asset.to_string(), to))
            .or_insert(Decimal::ZERO) += amount;
    }

    /// Set `spender`'s allowance over `owner`'s `asset` (overwrites).
    pub fn approve(&mut self, asset: &str, owner: UserId, spender: UserId, amount: Decimal) {
        self.allowances
            .insert((asset.to_string(), owner, spender), amount);
    }

    /// Reject (or stop rejecting) every transfer of `asset`.
    pub fn set_paused(&mut self, asset: &str, paused: bool) {
        if paused {
            self.paused.insert(asset.to_string());
        } else {
            self.paused.remove(asset);
        }
    }

    /// Sum of all balances of `asset`.
    #[must_use]
    pub fn total_supply(&self, asset: &str) -> Decimal {
        self.balances
            .iter()
            .filter(|((a, _), _)| a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }

    fn move_funds(&mut self, asset: &str, from: UserId, to: UserId, amount: Decimal) -> Result<()> {
        if self.paused.contains(asset) {
            return Err(ExchangeError::AssetTransferFailed {
                reason: format!("asset {asset} is paused"),
            });
        }
        if amount < Decimal::ZERO {
            return Err(ExchangeError::AssetTransferFailed {
                reason: format!("negative transfer of {amount}"),
            });
        }
        let held = self.balance_of(asset, from);
        if held < amount {
            return Err(ExchangeError::AssetTransferFailed {
                reason: format!("{from} holds {held} {asset}, cannot send {amount}"),
            });
        }
        self.balances.insert((asset.to_string(), from), held - amount);
        *self
            .balances
            .entry((asset.to_string(), to))
            .or_insert(Decimal::ZERO) += amount;
        Ok(())
    }
}

impl AssetLedger for MemoryAssetLedger {
    fn balance_of(&self, asset: &str, owner: UserId) -> Decimal {
        self.balances
            .get(&(asset.to_string(), owner))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn allowance(&self, asset: &str, owner: UserId, spender: UserId) -> Decimal {
        self.allowances
            .get(&(asset.to_string(), owner, spender))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn transfer_from(
        &mut self,
        asset: &str,
        spender: UserId,
        from: UserId,
        to: UserId,
        amount: Decimal,
    ) -> Result<()> {
        let allowed = self.allowance(asset, from, spender);
        if allowed < amount {
            return Err(ExchangeError::AssetTransferFailed {
                reason: format!("allowance {allowed} {asset} below {amount}"),
            });
        }
        self.move_funds(asset, from, to, amount)?;
        self.allowances
            .insert((asset.to_string(), from, spender), allowed - amount);
        Ok(())
    }

    fn transfer(&mut self, asset: &str, from: UserId, to: UserId, amount: Decimal) -> Result<()> {
        self.move_funds(asset, from, to, amount)
    }
}
