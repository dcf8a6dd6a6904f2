//! Settlement instructions for one trade.

use escrowdex_types::{Asset, ExchangeError, Result, UserId};
use rust_decimal::Decimal;

/// One direction of a trade: `amount` of `payer`'s locked `asset` leaves,
/// `amount − fee` arrives at `payee`, `fee` arrives at the fee recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementLeg {
    pub asset: Asset,
    pub payer: UserId,
    pub payee: UserId,
    pub amount: Decimal,
    pub fee: Decimal,
}

impl SettlementLeg {
    #[must_use]
    pub fn new(asset: impl Into<Asset>, payer: UserId, payee: UserId, amount: Decimal) -> Self {
        Self {
            asset: asset.into(),
            payer,
            payee,
            amount,
            fee: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = fee;
        self
    }

    /// What the payee actually receives.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.amount - self.fee
    }
}

/// Both legs of a trade. Applied all-or-nothing by
/// [`BalanceLedger::settle`](crate::BalanceLedger::settle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub legs: [SettlementLeg; 2],
    pub fee_recipient: UserId,
}

impl Settlement {
    #[must_use]
    pub fn new(first: SettlementLeg, second: SettlementLeg, fee_recipient: UserId) -> Self {
        Self {
            legs: [first, second],
            fee_recipient,
        }
    }

    /// Total fee collected across both legs, per asset.
    pub fn fees(&self) -> impl Iterator<Item = (&str, Decimal)> + '_ {
        self.legs
            .iter()
            .filter(|leg| !leg.fee.is_zero())
            .map(|leg| (leg.asset.as_str(), leg.fee))
    }

    /// Shape checks that need no balance state.
    ///
    /// # Errors
    /// [`ExchangeError::InvariantViolation`] if both legs share an asset, or a
    /// leg has a non-positive amount or a fee outside `[0, amount]`.
    pub fn validate(&self) -> Result<()> {
        let [first, second] = &self.legs;
        if first.asset == second.asset {
            return Err(ExchangeError::invariant(format!(
                "both settlement legs move {}",
                first.asset
            )));
        }
        for leg in &self.legs {
            if leg.amount <= Decimal::ZERO {
                return Err(ExchangeError::invariant(format!(
                    "settlement leg of {} {} is not positive",
                    leg.amount, leg.asset
                )));
            }
            if leg.fee < Decimal::ZERO || leg.fee > leg.amount {
                return Err(ExchangeError::invariant(format!(
                    "fee {} outside [0, {}] on {} leg",
                    leg.fee, leg.amount, leg.asset
                )));
            }
        }
        Ok(())
    }
}
