//! Order types for the escrowdex matching engine.
//!
//! Every order is fully funded before it exists: its reservation is locked
//! on the balance ledger at submission, so a resting order can always settle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::checked_mul;
use crate::{MarketPair, OrderId, Result, UserId};

/// Which side of the book this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// The side this order matches against.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// How the order was submitted.
///
/// A market order carries its worst acceptable price and rests at that
/// price if liquidity runs out, so both kinds share one matching path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderKind {
    Limit,
    Market,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Limit => write!(f, "LIMIT"),
            Self::Market => write!(f, "MARKET"),
        }
    }
}

/// Lifecycle status of an order. `Filled` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Filled,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Filled => write!(f, "FILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Core order struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: UserId,
    pub market: MarketPair,
    pub side: OrderSide,
    pub kind: OrderKind,
    pub status: OrderStatus,
    /// Limit price, or the worst acceptable price of a market order.
    pub price: Decimal,
    /// Original size in base units.
    pub quantity: Decimal,
    pub remaining: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    #[must_use]
    pub fn filled_qty(&self) -> Decimal {
        self.quantity - self.remaining
    }

    /// Whether a resting order at `price` on the opposite side is acceptable.
    #[must_use]
    pub fn accepts(&self, price: Decimal) -> bool {
        match self.side {
            OrderSide::Buy => price <= self.price,
            OrderSide::Sell => price >= self.price,
        }
    }

    /// Funds this order currently holds locked: `remaining × price` of the
    /// quote asset for a buy, `remaining` of the base asset for a sell.
    ///
    /// # Errors
    /// `Overflow` if the quote amount cannot be carried exactly.
    pub fn reserved(&self) -> Result<Decimal> {
        match self.side {
            OrderSide::Buy => checked_mul(self.remaining, self.price),
            OrderSide::Sell => Ok(self.remaining),
        }
    }

    /// `(buy_amount, sell_amount)` for `qty` base units at this order's own
    /// price, from the owner's point of view.
    ///
    /// # Errors
    /// `Overflow` if the quote amount cannot be carried exactly.
    pub fn amounts_for(&self, qty: Decimal) -> Result<(Decimal, Decimal)> {
        let quote = checked_mul(qty, self.price)?;
        Ok(match self.side {
            OrderSide::Buy => (qty, quote),
            OrderSide::Sell => (quote, qty),
        })
    }

    /// Reduce `remaining` by `qty`, moving to `Filled` at zero.
    pub fn apply_fill(&mut self, qty: Decimal, at: DateTime<Utc>) {
        self.remaining -= qty;
        if self.remaining.is_zero() {
            self.status = OrderStatus::Filled;
        }
        self.updated_at = at;
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy_limit(id: u64, side: OrderSide, price: Decimal, qty: Decimal) -> Self {
        Self::dummy_limit_for_user(id, UserId::new(), side, price, qty)
    }

    pub fn dummy_limit_for_user(
        id: u64,
        owner: UserId,
        side: OrderSide,
        price: Decimal,
        qty: Decimal,
    ) -> Self {
        Self {
            id: OrderId(id),
            owner,
            market: MarketPair::new("BTC", "USDT"),
            side,
            kind: OrderKind::Limit,
            status: OrderStatus::Open,
            price,
            quantity: qty,
            remaining: qty,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_side_display_and_opposite() {
        assert_eq!(format!("{}", OrderSide::Buy), "BUY");
        assert_eq!(format!("{}", OrderSide::Sell), "SELL");
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }

    #[test]
    fn buy_accepts_cheaper_sell_rejects_cheaper() {
        let buy = Order::dummy_limit(1, OrderSide::Buy, Decimal::new(100, 0), Decimal::ONE);
        assert!(buy.accepts(Decimal::new(99, 0)));
        assert!(buy.accepts(Decimal::new(100, 0)));
        assert!(!buy.accepts(Decimal::new(101, 0)));

        let sell = Order::dummy_limit(2, OrderSide::Sell, Decimal::new(100, 0), Decimal::ONE);
        assert!(sell.accepts(Decimal::new(101, 0)));
        assert!(!sell.accepts(Decimal::new(99, 0)));
    }

    #[test]
    fn reservation_tracks_remaining() {
        let mut buy = Order::dummy_limit(1, OrderSide::Buy, Decimal::new(3, 0), Decimal::new(10, 0));
        assert_eq!(buy.reserved().unwrap(), Decimal::new(30, 0));
        buy.apply_fill(Decimal::new(4, 0), Utc::now());
        assert_eq!(buy.reserved().unwrap(), Decimal::new(18, 0));

        let sell = Order::dummy_limit(2, OrderSide::Sell, Decimal::new(3, 0), Decimal::new(10, 0));
        assert_eq!(sell.reserved().unwrap(), Decimal::new(10, 0));
    }

    #[test]
    fn fill_tracking() {
        let mut order = Order::dummy_limit(1, OrderSide::Buy, Decimal::new(100, 0), Decimal::new(10, 0));
        order.apply_fill(Decimal::new(6, 0), Utc::now());
        assert!(order.is_open());
        assert_eq!(order.filled_qty(), Decimal::new(6, 0));
        order.apply_fill(Decimal::new(4, 0), Utc::now());
        assert_eq!(order.status, OrderStatus::Filled);
        assert!(order.status.is_terminal());
    }

    #[test]
    fn amounts_from_owner_perspective() {
        let sell = Order::dummy_limit(1, OrderSide::Sell, Decimal::new(2, 0), Decimal::new(5, 0));
        assert_eq!(
            sell.amounts_for(Decimal::new(5, 0)).unwrap(),
            (Decimal::new(10, 0), Decimal::new(5, 0))
        );
        let buy = Order::dummy_limit(2, OrderSide::Buy, Decimal::new(2, 0), Decimal::new(5, 0));
        assert_eq!(
            buy.amounts_for(Decimal::ONE).unwrap(),
            (Decimal::ONE, Decimal::TWO)
        );
    }

    #[test]
    fn unrepresentable_quote_is_an_error() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(20), 0);
        let sell = Order::dummy_limit(1, OrderSide::Sell, huge, huge);
        // A sell reserves base only, but its quote amount still overflows.
        assert_eq!(sell.reserved().unwrap(), huge);
        assert!(matches!(sell.amounts_for(huge), Err(crate::ExchangeError::Overflow)));

        let buy = Order::dummy_limit(2, OrderSide::Buy, huge, huge);
        assert!(matches!(buy.reserved(), Err(crate::ExchangeError::Overflow)));
    }
}
