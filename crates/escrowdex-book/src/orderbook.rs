//! The order book for a single market: a bid side and an ask side.

use escrowdex_types::{MarketPair, OrderId, OrderSide, Result};
use rust_decimal::Decimal;

use crate::book_side::{BookEntry, BookSide};

/// The order book for a single market pair.
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// The market this book serves (e.g., ETH/DAI).
    pub market: MarketPair,
    /// Buy side: highest price first.
    bids: BookSide,
    /// Sell side: lowest price first.
    asks: BookSide,
}

impl OrderBook {
    /// Create a new empty order book for the given market.
    #[must_use]
    pub fn new(market: MarketPair) -> Self {
        Self {
            market,
            bids: BookSide::new(OrderSide::Buy),
            asks: BookSide::new(OrderSide::Sell),
        }
    }

    #[must_use]
    pub fn side(&self, side: OrderSide) -> &BookSide {
        match side {
            OrderSide::Buy => &self.bids,
            OrderSide::Sell => &self.asks,
        }
    }

    pub fn side_mut(&mut self, side: OrderSide) -> &mut BookSide {
        match side {
            OrderSide::Buy => &mut self.bids,
            OrderSide::Sell => &mut self.asks,
        }
    }

    // =================================================================
    // Mutation
    // =================================================================

    /// Rest an order on `side` at `price`.
    pub fn insert(&mut self, side: OrderSide, id: OrderId, price: Decimal) -> Result<()> {
        self.side_mut(side).insert(id, price)
    }

    /// Remove an order from `side`. Returns `None` if it was not resting there.
    pub fn remove(&mut self, side: OrderSide, id: OrderId) -> Option<BookEntry> {
        self.side_mut(side).remove(id)
    }

    /// Number of resting orders on `side`.
    #[must_use]
    pub fn len(&self, side: OrderSide) -> usize {
        self.side(side).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn book() -> OrderBook {
        OrderBook::new(MarketPair::new("ETH", "DAI"))
    }

    #[test]
    fn sides_keep_their_own_priority() {
        let mut book = book();
        book.insert(OrderSide::Buy, OrderId(1), dec(99)).unwrap();
        book.insert(OrderSide::Buy, OrderId(2), dec(100)).unwrap();
        book.insert(OrderSide::Sell, OrderId(3), dec(102)).unwrap();
        book.insert(OrderSide::Sell, OrderId(4), dec(101)).unwrap();

        assert_eq!(book.side(OrderSide::Buy).best_price(), Some(dec(100)));
        assert_eq!(book.side(OrderSide::Sell).best_price(), Some(dec(101)));
        assert_eq!(book.len(OrderSide::Buy), 2);
        assert_eq!(book.len(OrderSide::Sell), 2);
    }

    #[test]
    fn remove_only_from_named_side() {
        let mut book = book();
        book.insert(OrderSide::Buy, OrderId(1), dec(100)).unwrap();
        assert!(book.remove(OrderSide::Sell, OrderId(1)).is_none());
        assert_eq!(book.len(OrderSide::Buy), 1);

        let removed = book.remove(OrderSide::Buy, OrderId(1)).unwrap();
        assert_eq!(removed.price, dec(100));
        assert_eq!(book.len(OrderSide::Buy), 0);
        assert_eq!(book.side(OrderSide::Buy).best_price(), None);
    }

    #[test]
    fn fresh_book_is_empty() {
        let book = book();
        assert_eq!(book.market.symbol(), "ETH/DAI");
        assert_eq!(book.len(OrderSide::Buy), 0);
        assert_eq!(book.len(OrderSide::Sell), 0);
    }
}
