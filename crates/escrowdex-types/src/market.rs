//! Registered trading pairs.

use serde::{Deserialize, Serialize};

use crate::{Asset, MarketPair, OrderSide};

/// A registered (base, quote) pair.
///
/// The asset mapping is fixed at registration; only `enabled` may change
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Symbol key, e.g. `ETH/DAI`.
    pub pair: MarketPair,
    /// Asset delivered by sellers, measured by order quantities.
    pub base_asset: Asset,
    /// Asset delivered by buyers, measured by `quantity × price`.
    pub quote_asset: Asset,
    pub enabled: bool,
}

impl Market {
    #[must_use]
    pub fn new(pair: MarketPair, base_asset: impl Into<Asset>, quote_asset: impl Into<Asset>) -> Self {
        Self {
            pair,
            base_asset: base_asset.into(),
            quote_asset: quote_asset.into(),
            enabled: true,
        }
    }

    /// The asset a trader on `side` must deliver (and therefore reserves).
    #[must_use]
    pub fn pay_asset(&self, side: OrderSide) -> &str {
        match side {
            OrderSide::Buy => &self.quote_asset,
            OrderSide::Sell => &self.base_asset,
        }
    }

    /// The asset a trader on `side` receives when filled.
    #[must_use]
    pub fn receive_asset(&self, side: OrderSide) -> &str {
        self.pay_asset(side.opposite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pay_and_receive_assets() {
        let m = Market::new(MarketPair::new("ETH", "DAI"), "0xeth", "0xdai");
        assert!(m.enabled);
        assert_eq!(m.pay_asset(OrderSide::Buy), "0xdai");
        assert_eq!(m.pay_asset(OrderSide::Sell), "0xeth");
        assert_eq!(m.receive_asset(OrderSide::Buy), "0xeth");
        assert_eq!(m.receive_asset(OrderSide::Sell), "0xdai");
    }
}
