//! Trade records produced by the matching engine.
//!
//! A [`Trade`] is the immutable record of a single fill between a taker and
//! a resting maker order, executed at the maker's price. Trades are not
//! retained by the exchange beyond the submission report and event log.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Asset, MarketPair, OrderId, OrderSide, TradeId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Deterministic id derived from `sequence`.
    pub id: TradeId,
    /// Exchange-wide fill sequence number.
    pub sequence: u64,
    pub market: MarketPair,
    /// The resting (maker) order.
    pub maker_order_id: OrderId,
    /// The aggressive order, or `None` for a direct fill of a resting order.
    pub taker_order_id: Option<OrderId>,
    pub maker: UserId,
    pub taker: UserId,
    /// Which side the taker was on.
    pub taker_side: OrderSide,
    /// Execution price (the maker's price).
    pub price: Decimal,
    /// Executed quantity in base asset.
    pub quantity: Decimal,
    /// Quote amount = price × quantity.
    pub quote_amount: Decimal,
    /// Fee carved out of one leg of the trade.
    pub fee: Decimal,
    pub fee_asset: Asset,
    pub fee_recipient: UserId,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    #[must_use]
    pub fn taker_is_buyer(&self) -> bool {
        self.taker_side == OrderSide::Buy
    }

    /// `(buyer, seller)` of the base asset.
    #[must_use]
    pub fn buyer_seller(&self) -> (UserId, UserId) {
        if self.taker_is_buyer() {
            (self.taker, self.maker)
        } else {
            (self.maker, self.taker)
        }
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[{}] {} {} {} @ {} = {} (fee {} {})",
            self.sequence,
            self.market,
            self.taker_side,
            self.quantity,
            self.price,
            self.quote_amount,
            self.fee,
            self.fee_asset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade() -> Trade {
        Trade {
            id: TradeId::deterministic(1),
            sequence: 1,
            market: MarketPair::new("BTC", "USDT"),
            maker_order_id: OrderId(1),
            taker_order_id: Some(OrderId(2)),
            maker: UserId::new(),
            taker: UserId::new(),
            taker_side: OrderSide::Buy,
            price: Decimal::new(50000, 0),
            quantity: Decimal::ONE,
            quote_amount: Decimal::new(50000, 0),
            fee: Decimal::new(50, 0),
            fee_asset: "USDT".into(),
            fee_recipient: UserId::new(),
            executed_at: Utc::now(),
        }
    }

    #[test]
    fn buyer_seller_follow_taker_side() {
        let mut t = make_trade();
        assert_eq!(t.buyer_seller(), (t.taker, t.maker));
        t.taker_side = OrderSide::Sell;
        assert_eq!(t.buyer_seller(), (t.maker, t.taker));
    }

    #[test]
    fn trade_display() {
        let s = format!("{}", make_trade());
        assert!(s.contains("BTC/USDT"));
        assert!(s.contains("50000"));
    }
}
