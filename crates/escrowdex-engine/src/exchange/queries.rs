//! Read-only views of exchange state.

use escrowdex_book::PriceLevel;
use escrowdex_types::{
    BalanceEntry, EventRecord, FeePolicy, Market, MarketPair, Order, OrderId, OrderSide,
    OrderStatus, Result, UserId,
};
use rust_decimal::Decimal;

use super::Exchange;
use crate::determinism::HashRoot;

impl Exchange {
    #[must_use]
    pub fn balance_of(&self, asset: &str, owner: UserId) -> BalanceEntry {
        self.ledger.balance(asset, owner)
    }

    #[must_use]
    pub fn is_market_enabled(&self, pair: &MarketPair) -> bool {
        self.registry.is_enabled(pair)
    }

    #[must_use]
    pub fn market(&self, pair: &MarketPair) -> Option<&Market> {
        self.registry.get(pair)
    }

    /// Resting orders on one side of `pair`; 0 for unknown markets.
    #[must_use]
    pub fn order_book_len(&self, side: OrderSide, pair: &MarketPair) -> usize {
        self.books.get(pair).map_or(0, |book| book.len(side))
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    #[must_use]
    pub fn is_order_cancelled(&self, id: OrderId) -> bool {
        self.order_status(id) == Some(OrderStatus::Cancelled)
    }

    #[must_use]
    pub fn is_order_filled(&self, id: OrderId) -> bool {
        self.order_status(id) == Some(OrderStatus::Filled)
    }

    /// Every order still open, in no particular order.
    pub fn open_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders.values().filter(|o| o.is_open())
    }

    #[must_use]
    pub fn best_price(&self, side: OrderSide, pair: &MarketPair) -> Option<Decimal> {
        self.books.get(pair)?.side(side).best_price()
    }

    /// Up to `levels` aggregated price levels, best first.
    #[must_use]
    pub fn depth(&self, side: OrderSide, pair: &MarketPair, levels: usize) -> Vec<PriceLevel> {
        let Some(book) = self.books.get(pair) else {
            return Vec::new();
        };
        let entries = book.side(side).iter().filter_map(|entry| {
            self.orders
                .get(&entry.id)
                .map(|order| (entry.price, order.remaining))
        });
        PriceLevel::aggregate(entries, levels)
    }

    #[must_use]
    pub fn fee_account(&self) -> UserId {
        self.config.fee_account
    }

    #[must_use]
    pub fn fee_percent(&self) -> Decimal {
        self.fees.percent()
    }

    #[must_use]
    pub fn fee_policy(&self) -> FeePolicy {
        self.fees.policy()
    }

    /// Σ(available + locked) of `asset` held in custody.
    #[must_use]
    pub fn total_supply(&self, asset: &str) -> Decimal {
        self.ledger.total_supply(asset)
    }

    /// # Errors
    /// `SupplyInvariantViolation` if `asset`'s holdings differ from its net
    /// deposits.
    pub fn verify_supply(&self, asset: &str) -> Result<()> {
        self.ledger.verify_supply(asset)
    }

    /// [`verify_supply`](Self::verify_supply) for every asset ever deposited.
    ///
    /// # Errors
    /// The first `SupplyInvariantViolation` found.
    pub fn verify_all_supply(&self) -> Result<()> {
        self.ledger.verify_all()
    }

    /// Committed events not yet drained.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        self.log.records()
    }

    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.log.drain()
    }

    /// Digest of the retained events, for comparing replays.
    ///
    /// # Errors
    /// `Serialization` if an event cannot be encoded.
    pub fn event_digest(&self) -> Result<HashRoot> {
        self.log.digest()
    }

    fn order_status(&self, id: OrderId) -> Option<OrderStatus> {
        self.orders.get(&id).map(|o| o.status)
    }
}
