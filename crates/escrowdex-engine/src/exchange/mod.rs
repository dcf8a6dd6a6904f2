//! The exchange facade.
//!
//! Owns every piece of mutable state. Each public operation takes
//! `&mut self`, validates, then mutates, then commits its staged events;
//! a failed operation leaves no trace.

mod queries;
mod trading;

use std::collections::HashMap;

use chrono::Utc;
use escrowdex_book::OrderBook;
use escrowdex_ledger::{AssetLedger, BalanceLedger};
use escrowdex_types::constants::{ENGINE_NAME, FIRST_ORDER_ID, VERSION};
use escrowdex_types::{
    ExchangeConfig, ExchangeEvent, MarketPair, Order, OrderId, Result, UserId,
};
use rust_decimal::Decimal;

use crate::event_log::EventLog;
use crate::fees::FeeCalculator;
use crate::registry::{MarketRegistry, RegistrarCheck, SingleRegistrar};

/// A custodial exchange: escrowed balances, markets, books and orders.
#[derive(Debug)]
pub struct Exchange {
    config: ExchangeConfig,
    ledger: BalanceLedger,
    registry: MarketRegistry,
    fees: FeeCalculator,
    books: HashMap<MarketPair, OrderBook>,
    /// Every order ever accepted, open or terminal.
    orders: HashMap<OrderId, Order>,
    next_order_id: OrderId,
    /// Exchange-wide fill counter, source of trade ids.
    next_fill_seq: u64,
    log: EventLog,
}

impl Exchange {
    /// Build an exchange whose registrar is `config.registrar`.
    ///
    /// # Errors
    /// `Configuration` if the config fails validation.
    pub fn new(config: ExchangeConfig) -> Result<Self> {
        let registrar = SingleRegistrar(config.registrar);
        Self::with_registrar(config, Box::new(registrar))
    }

    /// Build an exchange with a custom registrar capability check.
    ///
    /// # Errors
    /// `Configuration` if the config fails validation.
    pub fn with_registrar(config: ExchangeConfig, registrar: Box<dyn RegistrarCheck>) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            engine = ENGINE_NAME,
            version = VERSION,
            fee_account = %config.fee_account,
            fee_percent = %config.fee_percent,
            fee_policy = ?config.fee_policy,
            "Exchange created"
        );
        Ok(Self {
            ledger: BalanceLedger::new(config.custodian),
            registry: MarketRegistry::new(registrar),
            fees: FeeCalculator::from_config(&config),
            books: HashMap::new(),
            orders: HashMap::new(),
            next_order_id: OrderId(FIRST_ORDER_ID),
            next_fill_seq: 1,
            log: EventLog::new(),
            config,
        })
    }

    // =================================================================
    // Custody
    // =================================================================

    /// Pull `amount` of `asset` from `caller` on `external` into custody.
    ///
    /// # Errors
    /// `InvalidAmount`, `InsufficientBalance`, `InsufficientAllowance` or
    /// `AssetTransferFailed`; see [`BalanceLedger::deposit`].
    pub fn deposit<L>(&mut self, external: &mut L, asset: &str, amount: Decimal, caller: UserId) -> Result<()>
    where
        L: AssetLedger + ?Sized,
    {
        self.ledger.deposit(external, asset, caller, amount)?;
        tracing::info!(user = %caller, asset, %amount, "Deposit");
        self.commit(vec![ExchangeEvent::Deposit {
            asset: asset.to_string(),
            user: caller,
            amount,
        }]);
        Ok(())
    }

    /// Withdraw `amount` of `caller`'s available `asset` to `caller`.
    ///
    /// # Errors
    /// `InvalidAmount`, `InsufficientAvailable` or `AssetTransferFailed`.
    pub fn withdraw<L>(&mut self, external: &mut L, asset: &str, amount: Decimal, caller: UserId) -> Result<()>
    where
        L: AssetLedger + ?Sized,
    {
        self.withdraw_to(external, asset, amount, caller, caller)
    }

    /// Withdraw `amount` of `caller`'s available `asset` to `destination`.
    ///
    /// # Errors
    /// `InvalidAmount`, `InsufficientAvailable` or `AssetTransferFailed`.
    pub fn withdraw_to<L>(
        &mut self,
        external: &mut L,
        asset: &str,
        amount: Decimal,
        destination: UserId,
        caller: UserId,
    ) -> Result<()>
    where
        L: AssetLedger + ?Sized,
    {
        self.ledger
            .withdraw(external, asset, caller, amount, destination)?;
        tracing::info!(user = %caller, receiver = %destination, asset, %amount, "Withdraw");
        self.commit(vec![ExchangeEvent::Withdraw {
            asset: asset.to_string(),
            user: caller,
            receiver: destination,
            amount,
        }]);
        Ok(())
    }

    // =================================================================
    // Markets
    // =================================================================

    /// Register `base_symbol/quote_symbol` trading `base_asset` against
    /// `quote_asset`, and open an empty book for it.
    ///
    /// # Errors
    /// `NotAuthorized`, `InvalidMarket` or `MarketAlreadyRegistered`.
    pub fn register_market(
        &mut self,
        base_asset: &str,
        quote_asset: &str,
        base_symbol: &str,
        quote_symbol: &str,
        caller: UserId,
    ) -> Result<MarketPair> {
        let market = self
            .registry
            .register(base_asset, quote_asset, base_symbol, quote_symbol, caller)?;
        let pair = market.pair.clone();
        let event = ExchangeEvent::MarketRegistered {
            market: pair.clone(),
            base_asset: market.base_asset.clone(),
            quote_asset: market.quote_asset.clone(),
        };
        self.books.insert(pair.clone(), OrderBook::new(pair.clone()));
        tracing::info!(market = %pair, base_asset, quote_asset, "Market registered");
        self.commit(vec![event]);
        Ok(pair)
    }

    /// Halt (`false`) or resume (`true`) trading on `pair`. Resting orders
    /// stay in the book while halted.
    ///
    /// # Errors
    /// `NotAuthorized` or `InvalidMarket`.
    pub fn set_market_enabled(&mut self, pair: &MarketPair, enabled: bool, caller: UserId) -> Result<()> {
        if self.registry.set_enabled(pair, enabled, caller)? {
            tracing::info!(market = %pair, enabled, "Market status changed");
            self.commit(vec![ExchangeEvent::MarketStatusChanged {
                market: pair.clone(),
                enabled,
            }]);
        }
        Ok(())
    }

    fn commit(&mut self, staged: Vec<ExchangeEvent>) {
        self.log.commit(staged, Utc::now());
    }
}
