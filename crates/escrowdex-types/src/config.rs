//! Exchange configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{FEE_PERCENT_PRECISION, FEE_PERCENT_SCALE};
use crate::{ExchangeError, Result, UserId};

/// Which leg of a trade carries the fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeePolicy {
    /// The fee is carved out of what the taker delivers: the maker
    /// receives the counter-amount minus the fee.
    #[default]
    TakerPayment,
    /// The fee is carved out of what the taker receives.
    TakerProceeds,
}

/// Construction-time configuration for an exchange instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// The exchange's own account on the external asset ledger. Deposits
    /// are pulled into it, withdrawals are paid out of it.
    pub custodian: UserId,
    /// The only account allowed to register and halt markets.
    pub registrar: UserId,
    /// Receives every fee as available balance.
    pub fee_account: UserId,
    /// Plain percentage on a 0–100 scale (`10` = 10%).
    pub fee_percent: Decimal,
    #[serde(default)]
    pub fee_policy: FeePolicy,
}

impl ExchangeConfig {
    #[must_use]
    pub fn new(custodian: UserId, registrar: UserId, fee_account: UserId, fee_percent: Decimal) -> Self {
        Self {
            custodian,
            registrar,
            fee_account,
            fee_percent,
            fee_policy: FeePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_fee_policy(mut self, policy: FeePolicy) -> Self {
        self.fee_policy = policy;
        self
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`ExchangeError::Configuration`] if the fee percentage is
    /// outside `[0, 100)` or too precise.
    pub fn validate(&self) -> Result<()> {
        if self.fee_percent < Decimal::ZERO || self.fee_percent >= FEE_PERCENT_SCALE {
            return Err(ExchangeError::Configuration(format!(
                "fee_percent must be in [0, 100), got {}",
                self.fee_percent
            )));
        }
        if self.fee_percent.normalize().scale() > FEE_PERCENT_PRECISION {
            return Err(ExchangeError::Configuration(format!(
                "fee_percent supports at most {FEE_PERCENT_PRECISION} decimals, got {}",
                self.fee_percent
            )));
        }
        Ok(())
    }
}
