//! Per-asset supply accounting.
//!
//! ```text
//! ∀ asset: Σ(available + locked) == Σ deposits − Σ withdrawals
//! ```
//!
//! Trades and fees only move value between accounts inside the ledger, so
//! only deposits and withdrawals may change an asset's supply.

use std::collections::BTreeMap;

use escrowdex_types::{Asset, ExchangeError, Result};
use rust_decimal::Decimal;

/// Cumulative external flows for one asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetFlow {
    pub deposited: Decimal,
    pub withdrawn: Decimal,
}

impl AssetFlow {
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.deposited - self.withdrawn
    }
}

/// Tracks what each asset's internal supply ought to be.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    flows: BTreeMap<Asset, AssetFlow>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_deposit(&mut self, asset: &str, amount: Decimal) {
        self.flows.entry(asset.to_string()).or_default().deposited += amount;
    }

    pub fn record_withdrawal(&mut self, asset: &str, amount: Decimal) {
        self.flows.entry(asset.to_string()).or_default().withdrawn += amount;
    }

    #[must_use]
    pub fn flow(&self, asset: &str) -> AssetFlow {
        self.flows.get(asset).copied().unwrap_or_default()
    }

    /// Deposits minus withdrawals.
    #[must_use]
    pub fn expected_supply(&self, asset: &str) -> Decimal {
        self.flow(asset).net()
    }

    /// Compare the ledger's actual holdings of `asset` with the expected supply.
    ///
    /// # Errors
    /// Returns [`ExchangeError::SupplyInvariantViolation`] on any mismatch.
    pub fn verify(&self, asset: &str, actual: Decimal) -> Result<()> {
        let flow = self.flow(asset);
        if actual != flow.net() {
            return Err(ExchangeError::SupplyInvariantViolation {
                reason: format!(
                    "{asset}: held {actual}, expected {} (deposited {}, withdrawn {})",
                    flow.net(),
                    flow.deposited,
                    flow.withdrawn
                ),
            });
        }
        Ok(())
    }

    /// Every asset that has ever been deposited, in name order.
    pub fn tracked_assets(&self) -> impl Iterator<Item = &str> + '_ {
        self.flows.keys().map(String::as_str)
    }
}
