//! Custodied balances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Asset id on the external asset ledger, e.g. a token address.
pub type Asset = String;

/// What the exchange holds for one owner in one asset.
///
/// `available` may be withdrawn or committed to a new order; `locked`
/// backs the owner's open orders and only leaves through settlement or
/// cancellation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceEntry {
    pub available: Decimal,
    pub locked: Decimal,
}

impl BalanceEntry {
    /// Everything held in custody for this owner: `available + locked`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.available + self.locked
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.available.is_zero() && self.locked.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_entry_holds_nothing() {
        let entry = BalanceEntry::default();
        assert!(entry.is_zero());
        assert_eq!(entry.total(), Decimal::ZERO);
    }

    #[test]
    fn locked_funds_count_toward_custody() {
        let entry = BalanceEntry {
            available: Decimal::ZERO,
            locked: Decimal::new(25, 1),
        };
        assert!(!entry.is_zero());
        assert_eq!(entry.total(), Decimal::new(25, 1));
    }
}
