//! Market registry.
//!
//! Maps a [`MarketPair`] to its two asset ids and an enabled flag. Who may
//! register or halt a market is decided by an injected [`RegistrarCheck`].

use std::collections::BTreeMap;
use std::fmt;

use escrowdex_types::{ExchangeError, Market, MarketPair, Result, UserId};

/// Capability check for privileged market operations.
pub trait RegistrarCheck: fmt::Debug + Send + Sync {
    fn is_registrar(&self, caller: UserId) -> bool;
}

/// Exactly one account holds the registrar capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleRegistrar(pub UserId);

impl RegistrarCheck for SingleRegistrar {
    fn is_registrar(&self, caller: UserId) -> bool {
        caller == self.0
    }
}

/// All registered markets, keyed by symbol pair.
#[derive(Debug)]
pub struct MarketRegistry {
    markets: BTreeMap<MarketPair, Market>,
    registrar: Box<dyn RegistrarCheck>,
}

impl MarketRegistry {
    #[must_use]
    pub fn new(registrar: Box<dyn RegistrarCheck>) -> Self {
        Self {
            markets: BTreeMap::new(),
            registrar,
        }
    }

    /// Register `base_symbol/quote_symbol`, enabled.
    ///
    /// # Errors
    /// - `NotAuthorized` unless `caller` is the registrar
    /// - `InvalidMarket` for empty symbols or assets, or base asset == quote asset
    /// - `MarketAlreadyRegistered` if the pair exists
    pub fn register(
        &mut self,
        base_asset: &str,
        quote_asset: &str,
        base_symbol: &str,
        quote_symbol: &str,
        caller: UserId,
    ) -> Result<&Market> {
        self.authorize(caller, "register a market")?;

        let pair = MarketPair::new(base_symbol, quote_symbol);
        if base_symbol.is_empty()
            || quote_symbol.is_empty()
            || base_asset.is_empty()
            || quote_asset.is_empty()
            || base_asset == quote_asset
        {
            return Err(ExchangeError::invalid_market(&pair));
        }
        if self.markets.contains_key(&pair) {
            return Err(ExchangeError::MarketAlreadyRegistered(pair));
        }

        let market = Market::new(pair.clone(), base_asset, quote_asset);
        Ok(&*self.markets.entry(pair).or_insert(market))
    }

    /// Halt or resume trading. Returns `true` if the flag actually changed.
    ///
    /// # Errors
    /// `NotAuthorized` for non-registrars, `InvalidMarket` for unknown pairs.
    pub fn set_enabled(&mut self, pair: &MarketPair, enabled: bool, caller: UserId) -> Result<bool> {
        self.authorize(caller, "change market status")?;
        let market = self
            .markets
            .get_mut(pair)
            .ok_or_else(|| ExchangeError::invalid_market(pair))?;
        let changed = market.enabled != enabled;
        market.enabled = enabled;
        Ok(changed)
    }

    #[must_use]
    pub fn is_enabled(&self, pair: &MarketPair) -> bool {
        self.markets.get(pair).is_some_and(|m| m.enabled)
    }

    /// The market for `pair`, if it exists and is trading.
    ///
    /// # Errors
    /// `InvalidMarket` if unknown or disabled.
    pub fn resolve(&self, pair: &MarketPair) -> Result<&Market> {
        self.markets
            .get(pair)
            .filter(|m| m.enabled)
            .ok_or_else(|| ExchangeError::invalid_market(pair))
    }

    #[must_use]
    pub fn get(&self, pair: &MarketPair) -> Option<&Market> {
        self.markets.get(pair)
    }

    pub fn markets(&self) -> impl Iterator<Item = &Market> + '_ {
        self.markets.values()
    }

    fn authorize(&self, caller: UserId, action: &str) -> Result<()> {
        if self.registrar.is_registrar(caller) {
            return Ok(());
        }
        tracing::warn!(caller = %caller, action, "Rejected privileged call");
        Err(ExchangeError::not_authorized(format!(
            "{caller} may not {action}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (MarketRegistry, UserId) {
        let admin = UserId::new();
        (MarketRegistry::new(Box::new(SingleRegistrar(admin))), admin)
    }

    #[test]
    fn register_and_resolve() {
        let (mut reg, admin) = registry();
        let market = reg.register("0xeth", "0xdai", "ETH", "DAI", admin).unwrap();
        assert_eq!(market.pair.symbol(), "ETH/DAI");
        assert!(market.enabled);

        let pair = MarketPair::new("ETH", "DAI");
        assert!(reg.is_enabled(&pair));
        assert_eq!(reg.resolve(&pair).unwrap().quote_asset, "0xdai");
    }

    #[test]
    fn only_registrar_registers() {
        let (mut reg, _) = registry();
        let err = reg
            .register("0xeth", "0xdai", "ETH", "DAI", UserId::new())
            .unwrap_err();
        assert!(matches!(err, ExchangeError::NotAuthorized { .. }));
        assert_eq!(reg.markets().count(), 0);
    }

    #[test]
    fn rejects_malformed_and_duplicate() {
        let (mut reg, admin) = registry();
        assert!(matches!(
            reg.register("0xeth", "0xeth", "ETH", "DAI", admin),
            Err(ExchangeError::InvalidMarket { .. })
        ));
        assert!(matches!(
            reg.register("0xeth", "0xdai", "", "DAI", admin),
            Err(ExchangeError::InvalidMarket { .. })
        ));
        reg.register("0xeth", "0xdai", "ETH", "DAI", admin).unwrap();
        assert!(matches!(
            reg.register("0xother", "0xdai", "ETH", "DAI", admin),
            Err(ExchangeError::MarketAlreadyRegistered(_))
        ));
        // The original mapping survives.
        let pair = MarketPair::new("ETH", "DAI");
        assert_eq!(reg.get(&pair).unwrap().base_asset, "0xeth");
    }

    #[test]
    fn disabled_market_does_not_resolve() {
        let (mut reg, admin) = registry();
        reg.register("0xeth", "0xdai", "ETH", "DAI", admin).unwrap();
        let pair = MarketPair::new("ETH", "DAI");

        assert!(reg.set_enabled(&pair, false, admin).unwrap());
        assert!(!reg.set_enabled(&pair, false, admin).unwrap());
        assert!(!reg.is_enabled(&pair));
        assert!(matches!(
            reg.resolve(&pair),
            Err(ExchangeError::InvalidMarket { .. })
        ));

        assert!(reg.set_enabled(&pair, true, admin).unwrap());
        assert!(reg.resolve(&pair).is_ok());
    }

    #[test]
    fn unknown_market() {
        let (mut reg, admin) = registry();
        let pair = MarketPair::new("X", "Y");
        assert!(!reg.is_enabled(&pair));
        assert!(reg.set_enabled(&pair, true, admin).is_err());
        assert!(reg.set_enabled(&pair, true, UserId::new()).is_err());
    }
}
