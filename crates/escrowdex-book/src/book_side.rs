//! One side of one market's book.
//!
//! Uses a `BTreeMap` keyed by `(rank, id)` for priority ordering, where
//! `rank` is `-price` for bids and `price` for asks, so the first key is
//! always the best order. An auxiliary `HashMap<OrderId, key>` enables
//! O(log N) removal from anywhere in the queue.

use std::collections::{BTreeMap, HashMap};

use escrowdex_types::{ExchangeError, OrderId, OrderSide, Result};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PriorityKey {
    rank: Decimal,
    id: OrderId,
}

/// A resting order as the book sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookEntry {
    pub id: OrderId,
    pub price: Decimal,
}

/// Priority-ordered set of resting orders for a single (market, side).
#[derive(Debug, Clone)]
pub struct BookSide {
    side: OrderSide,
    /// Priority queue: first entry is the best order. Value is the price.
    queue: BTreeMap<PriorityKey, Decimal>,
    /// Fast lookup: `OrderId -> key` for O(log N) removal.
    index: HashMap<OrderId, PriorityKey>,
}

impl BookSide {
    #[must_use]
    pub fn new(side: OrderSide) -> Self {
        Self {
            side,
            queue: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    fn key(&self, id: OrderId, price: Decimal) -> PriorityKey {
        let rank = match self.side {
            OrderSide::Buy => -price,
            OrderSide::Sell => price,
        };
        PriorityKey { rank, id }
    }

    /// Insert an order at its priority position.
    pub fn insert(&mut self, id: OrderId, price: Decimal) -> Result<()> {
        if self.index.contains_key(&id) {
            return Err(ExchangeError::DuplicateOrder(id));
        }
        let key = self.key(id, price);
        self.index.insert(id, key);
        self.queue.insert(key, price);
        Ok(())
    }

    /// Highest-priority order, if any.
    #[must_use]
    pub fn best(&self) -> Option<BookEntry> {
        self.queue
            .iter()
            .next()
            .map(|(key, price)| BookEntry { id: key.id, price: *price })
    }

    /// Best price on this side, if any.
    #[must_use]
    pub fn best_price(&self) -> Option<Decimal> {
        self.best().map(|entry| entry.price)
    }

    /// Remove an order by id from anywhere in the queue.
    pub fn remove(&mut self, id: OrderId) -> Option<BookEntry> {
        let key = self.index.remove(&id)?;
        let price = self.queue.remove(&key)?;
        Some(BookEntry { id, price })
    }

    #[must_use]
    pub fn contains(&self, id: OrderId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate from best to worst priority.
    pub fn iter(&self) -> impl Iterator<Item = BookEntry> + '_ {
        self.queue
            .iter()
            .map(|(key, price)| BookEntry { id: key.id, price: *price })
    }
}
