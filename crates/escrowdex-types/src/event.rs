//! Exchange events.
//!
//! Every committed operation appends its events, in order, to the event
//! log. A failed operation appends nothing. Buy/sell fields are expressed
//! from the point of view of the order's owner (the maker, for trades).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Asset, MarketPair, OrderId, OrderKind, OrderSide, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExchangeEvent {
    Deposit {
        asset: Asset,
        user: UserId,
        amount: Decimal,
    },
    Withdraw {
        asset: Asset,
        /// Owner whose balance was debited.
        user: UserId,
        /// Account that received the funds on the asset ledger.
        receiver: UserId,
        amount: Decimal,
    },
    MarketRegistered {
        market: MarketPair,
        base_asset: Asset,
        quote_asset: Asset,
    },
    MarketStatusChanged {
        market: MarketPair,
        enabled: bool,
    },
    OrderPlaced {
        order_id: OrderId,
        trader: UserId,
        market: MarketPair,
        side: OrderSide,
        kind: OrderKind,
        buy_asset: Asset,
        sell_asset: Asset,
        buy_amount: Decimal,
        sell_amount: Decimal,
    },
    OrderBookChanged {
        side: OrderSide,
        market: MarketPair,
        new_length: usize,
    },
    Trade {
        /// The maker order that was (partially) filled.
        order_id: OrderId,
        taker_order_id: Option<OrderId>,
        maker: UserId,
        taker: UserId,
        buy_asset: Asset,
        sell_asset: Asset,
        buy_amount: Decimal,
        sell_amount: Decimal,
        fee_amount: Decimal,
        fee_asset: Asset,
    },
    OrderCancelled {
        order_id: OrderId,
        trader: UserId,
        market: MarketPair,
        side: OrderSide,
        buy_asset: Asset,
        sell_asset: Asset,
        buy_amount: Decimal,
        sell_amount: Decimal,
    },
}

impl ExchangeEvent {
    /// Short event name, useful for logs and assertions.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "Deposit",
            Self::Withdraw { .. } => "Withdraw",
            Self::MarketRegistered { .. } => "MarketRegistered",
            Self::MarketStatusChanged { .. } => "MarketStatusChanged",
            Self::OrderPlaced { .. } => "OrderPlaced",
            Self::OrderBookChanged { .. } => "OrderBookChanged",
            Self::Trade { .. } => "Trade",
            Self::OrderCancelled { .. } => "OrderCancelled",
        }
    }
}

/// An event together with its position in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the event log, starting at 0.
    pub sequence: u64,
    pub at: DateTime<Utc>,
    pub event: ExchangeEvent,
}
