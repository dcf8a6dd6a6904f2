//! Internal balances with available/locked accounting.
//!
//! Every mutating method either applies completely or leaves the ledger
//! untouched: all checks run before the first write.
//!
//! Deposits keep each asset's custody at or below [`MAX_ASSET_SUPPLY`], so
//! every balance and every amount moved between balances stays exact.

use std::collections::HashMap;

use escrowdex_types::constants::MAX_ASSET_SUPPLY;
use escrowdex_types::numeric::{checked_add, validate_amount};
use escrowdex_types::{Asset, BalanceEntry, ExchangeError, Result, UserId};
use rust_decimal::Decimal;

use crate::asset_ledger::AssetLedger;
use crate::settlement::Settlement;
use crate::supply_conservation::SupplyConservation;

/// Per-(asset, owner) balances held in custody by the exchange.
#[derive(Debug, Clone)]
pub struct BalanceLedger {
    /// The exchange's account on the external asset ledger.
    custodian: UserId,
    balances: HashMap<(Asset, UserId), BalanceEntry>,
    supply: SupplyConservation,
}

impl BalanceLedger {
    #[must_use]
    pub fn new(custodian: UserId) -> Self {
        Self {
            custodian,
            balances: HashMap::new(),
            supply: SupplyConservation::new(),
        }
    }

    // =================================================================
    // Custody
    // =================================================================

    /// Pull `amount` of `asset` from `owner` on the external ledger into
    /// custody and credit it as available.
    ///
    /// # Errors
    /// - `InvalidAmount` for a non-positive or over-precise amount
    /// - `InsufficientBalance` if `owner` holds less than `amount` externally
    /// - `InsufficientAllowance` if the custodian may not move that much
    /// - `Overflow` if custody of `asset` would exceed [`MAX_ASSET_SUPPLY`]
    /// - `AssetTransferFailed` if the external ledger refuses the transfer
    pub fn deposit<L>(&mut self, external: &mut L, asset: &str, owner: UserId, amount: Decimal) -> Result<()>
    where
        L: AssetLedger + ?Sized,
    {
        let amount = validate_amount(amount)?;
        if checked_add(self.supply.expected_supply(asset), amount)? > MAX_ASSET_SUPPLY {
            return Err(ExchangeError::Overflow);
        }
        let held = external.balance_of(asset, owner);
        if held < amount {
            return Err(ExchangeError::InsufficientBalance {
                needed: amount,
                available: held,
            });
        }
        let allowed = external.allowance(asset, owner, self.custodian);
        if allowed < amount {
            return Err(ExchangeError::InsufficientAllowance {
                needed: amount,
                allowed,
            });
        }
        external.transfer_from(asset, self.custodian, owner, self.custodian, amount)?;

        self.entry_mut(asset, owner).available += amount;
        self.supply.record_deposit(asset, amount);
        Ok(())
    }

    /// Pay `amount` of `owner`'s available `asset` out of custody to
    /// `destination` on the external ledger.
    ///
    /// # Errors
    /// - `InvalidAmount` for a non-positive or over-precise amount
    /// - `InsufficientAvailable` if the unlocked balance is too small
    /// - `AssetTransferFailed` if the external ledger refuses the transfer
    pub fn withdraw<L>(
        &mut self,
        external: &mut L,
        asset: &str,
        owner: UserId,
        amount: Decimal,
        destination: UserId,
    ) -> Result<()>
    where
        L: AssetLedger + ?Sized,
    {
        let amount = validate_amount(amount)?;
        let available = self.balance(asset, owner).available;
        if available < amount {
            return Err(ExchangeError::InsufficientAvailable {
                needed: amount,
                available,
            });
        }
        external.transfer(asset, self.custodian, destination, amount)?;

        self.entry_mut(asset, owner).available -= amount;
        self.supply.record_withdrawal(asset, amount);
        Ok(())
    }

    // =================================================================
    // Reservations
    // =================================================================

    /// Move `amount` from available to locked.
    ///
    /// # Errors
    /// `InsufficientAvailable` if available < amount.
    pub fn lock(&mut self, asset: &str, owner: UserId, amount: Decimal) -> Result<()> {
        Self::non_negative(amount)?;
        let available = self.balance(asset, owner).available;
        if available < amount {
            return Err(ExchangeError::InsufficientAvailable {
                needed: amount,
                available,
            });
        }
        let entry = self.entry_mut(asset, owner);
        entry.available -= amount;
        entry.locked += amount;
        Ok(())
    }

    /// Move `amount` from locked back to available.
    ///
    /// # Errors
    /// `InsufficientLocked` if locked < amount.
    pub fn unlock(&mut self, asset: &str, owner: UserId, amount: Decimal) -> Result<()> {
        Self::non_negative(amount)?;
        let locked = self.balance(asset, owner).locked;
        if locked < amount {
            return Err(ExchangeError::InsufficientLocked { needed: amount, locked });
        }
        let entry = self.entry_mut(asset, owner);
        entry.locked -= amount;
        entry.available += amount;
        Ok(())
    }

    // =================================================================
    // Settlement
    // =================================================================

    /// Apply both legs of a trade out of the payers' locked balances.
    ///
    /// # Errors
    /// - `InvariantViolation` if the settlement is malformed
    /// - `InsufficientLocked` if a payer has not reserved enough
    pub fn settle(&mut self, settlement: &Settlement) -> Result<()> {
        settlement.validate()?;
        for leg in &settlement.legs {
            let locked = self.balance(&leg.asset, leg.payer).locked;
            if locked < leg.amount {
                return Err(ExchangeError::InsufficientLocked {
                    needed: leg.amount,
                    locked,
                });
            }
        }

        for leg in &settlement.legs {
            self.entry_mut(&leg.asset, leg.payer).locked -= leg.amount;
            self.entry_mut(&leg.asset, leg.payee).available += leg.net();
        }
        for (asset, fee) in settlement.fees() {
            self.entry_mut(asset, settlement.fee_recipient).available += fee;
        }
        tracing::debug!(
            first = %settlement.legs[0].asset,
            second = %settlement.legs[1].asset,
            "Settled trade"
        );
        Ok(())
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn balance(&self, asset: &str, owner: UserId) -> BalanceEntry {
        self.balances
            .get(&(asset.to_string(), owner))
            .copied()
            .unwrap_or_default()
    }

    /// Σ(available + locked) of `asset` across all owners.
    #[must_use]
    pub fn total_supply(&self, asset: &str) -> Decimal {
        self.balances
            .iter()
            .filter(|((a, _), _)| a == asset)
            .map(|(_, entry)| entry.total())
            .sum()
    }

    /// Check that `asset`'s internal supply equals its net external flow.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` on mismatch.
    pub fn verify_supply(&self, asset: &str) -> Result<()> {
        let result = self.supply.verify(asset, self.total_supply(asset));
        if let Err(err) = &result {
            tracing::warn!(asset, error = %err, "Supply conservation broken");
        }
        result
    }

    /// [`verify_supply`](Self::verify_supply) for every asset ever deposited.
    ///
    /// # Errors
    /// The first `SupplyInvariantViolation` found.
    pub fn verify_all(&self) -> Result<()> {
        self.supply
            .tracked_assets()
            .try_for_each(|asset| self.verify_supply(asset))
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }

    fn entry_mut(&mut self, asset: &str, owner: UserId) -> &mut BalanceEntry {
        self.balances.entry((asset.to_string(), owner)).or_default()
    }

    fn non_negative(amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(ExchangeError::InvalidAmount(amount));
        }
        Ok(())
    }
}
