//! Order entry, matching, cancellation and direct fills.

use chrono::{DateTime, Utc};
use escrowdex_types::numeric::{checked_mul, validate_price, validate_quantity};
use escrowdex_types::{
    ExchangeError, ExchangeEvent, Market, MarketPair, Order, OrderId, OrderKind, OrderSide,
    OrderStatus, Result, Trade, TradeId, UserId,
};
use rust_decimal::Decimal;

use super::Exchange;
use crate::matching::{self, PlannedFill};
use crate::report::SubmitReport;

impl Exchange {
    /// Place a limit order: lock its reservation, match it against the
    /// opposite side, rest any remainder.
    ///
    /// # Errors
    /// - `InvalidQuantity` / `InvalidPrice` for non-positive or over-precise input
    /// - `InvalidMarket` if the market is unknown or halted
    /// - `InsufficientAvailable` if the reservation cannot be locked
    /// - `Overflow` if an amount is unrepresentable
    pub fn limit_order(
        &mut self,
        quantity: Decimal,
        price: Decimal,
        side: OrderSide,
        pair: &MarketPair,
        caller: UserId,
    ) -> Result<SubmitReport> {
        self.submit(OrderKind::Limit, quantity, price, side, pair, caller)
    }

    /// Place a market order bounded by `worst_price`. Behaves exactly like a
    /// limit order at that price, including resting any remainder.
    ///
    /// # Errors
    /// As [`limit_order`](Self::limit_order).
    pub fn market_order(
        &mut self,
        quantity: Decimal,
        worst_price: Decimal,
        side: OrderSide,
        pair: &MarketPair,
        caller: UserId,
    ) -> Result<SubmitReport> {
        self.submit(OrderKind::Market, quantity, worst_price, side, pair, caller)
    }

    fn submit(
        &mut self,
        kind: OrderKind,
        quantity: Decimal,
        price: Decimal,
        side: OrderSide,
        pair: &MarketPair,
        caller: UserId,
    ) -> Result<SubmitReport> {
        let quantity = validate_quantity(quantity)?;
        let price = validate_price(price)?;
        let market = self.registry.resolve(pair)?.clone();
        let pay_asset = market.pay_asset(side).to_string();

        // A sell reserves base, but its quote amount must still be exact.
        let quote = checked_mul(quantity, price)?;
        let (reservation, buy_amount, sell_amount) = match side {
            OrderSide::Buy => (quote, quantity, quote),
            OrderSide::Sell => (quantity, quote, quantity),
        };
        let available = self.ledger.balance(&pay_asset, caller).available;
        if available < reservation {
            return Err(ExchangeError::InsufficientAvailable {
                needed: reservation,
                available,
            });
        }

        let now = Utc::now();
        let mut order = Order {
            id: self.next_order_id,
            owner: caller,
            market: pair.clone(),
            side,
            kind,
            status: OrderStatus::Open,
            price,
            quantity,
            remaining: quantity,
            created_at: now,
            updated_at: now,
        };

        let book = self.book(pair)?;
        let opposite_len = book.len(side.opposite());
        let fills = matching::plan_crossing(
            book.side(side.opposite()),
            &self.orders,
            &order,
            &market,
            &self.fees,
        )?;

        // Planning succeeded: from here on only invariant violations can fail.
        self.ledger.lock(&pay_asset, caller, reservation)?;

        let mut staged = Vec::with_capacity(fills.len() + 3);
        let mut trades = Vec::with_capacity(fills.len());
        for fill in fills {
            let trade = self.execute(&market, fill, Some(order.id), caller, side, now, &mut staged)?;
            order.apply_fill(trade.quantity, now);
            trades.push(trade);
        }

        let book = self.book_mut(pair)?;
        if order.is_open() {
            book.insert(side, order.id, price)?;
        }
        let (opposite_now, own_now) = (book.len(side.opposite()), book.len(side));
        if opposite_now != opposite_len {
            staged.push(ExchangeEvent::OrderBookChanged {
                side: side.opposite(),
                market: pair.clone(),
                new_length: opposite_now,
            });
        }
        staged.push(ExchangeEvent::OrderBookChanged {
            side,
            market: pair.clone(),
            new_length: own_now,
        });
        staged.push(ExchangeEvent::OrderPlaced {
            order_id: order.id,
            trader: caller,
            market: pair.clone(),
            side,
            kind,
            buy_asset: market.receive_asset(side).to_string(),
            sell_asset: pay_asset,
            buy_amount,
            sell_amount,
        });

        tracing::info!(
            order = %order.id,
            trader = %caller,
            market = %pair,
            %side,
            kind = ?kind,
            %price,
            %quantity,
            fills = trades.len(),
            remaining = %order.remaining,
            "Order placed"
        );

        let report = SubmitReport::new(order.id, order.status, order.remaining, trades);
        self.next_order_id = order.id.next();
        self.orders.insert(order.id, order);
        self.commit(staged);
        Ok(report)
    }

    /// Cancel an open order and release its reservation.
    ///
    /// Cancelling an order that is already filled or cancelled is a silent
    /// no-op for its owner.
    ///
    /// # Errors
    /// - `InvalidMarket` if the market is unknown or halted
    /// - `InvalidOrder` if no such order exists on that market and side
    /// - `NotAuthorized` if `caller` does not own the order
    pub fn cancel_order(
        &mut self,
        order_id: OrderId,
        side: OrderSide,
        pair: &MarketPair,
        caller: UserId,
    ) -> Result<()> {
        let market = self.registry.resolve(pair)?.clone();
        let order = self
            .orders
            .get(&order_id)
            .filter(|o| &o.market == pair && o.side == side)
            .ok_or(ExchangeError::InvalidOrder(order_id))?;
        if order.owner != caller {
            tracing::warn!(order = %order_id, caller = %caller, "Cancel by non-owner rejected");
            return Err(ExchangeError::not_authorized(format!(
                "{caller} does not own order {order_id}"
            )));
        }
        if order.status.is_terminal() {
            return Ok(());
        }

        let reserved = order.reserved()?;
        let (buy_amount, sell_amount) = order.amounts_for(order.remaining)?;
        let pay_asset = market.pay_asset(side);

        let book = self.book(pair)?;
        if !book.side(side).contains(order_id) {
            return Err(ExchangeError::invariant(format!(
                "open order {order_id} is not resting"
            )));
        }
        self.ledger.unlock(pay_asset, caller, reserved)?;
        let book = self.book_mut(pair)?;
        book.remove(side, order_id);
        let new_length = book.len(side);

        let now = Utc::now();
        if let Some(order) = self.orders.get_mut(&order_id) {
            order.status = OrderStatus::Cancelled;
            order.updated_at = now;
        }

        tracing::info!(order = %order_id, trader = %caller, market = %pair, "Order cancelled");
        self.commit(vec![
            ExchangeEvent::OrderBookChanged {
                side,
                market: pair.clone(),
                new_length,
            },
            ExchangeEvent::OrderCancelled {
                order_id,
                trader: caller,
                market: pair.clone(),
                side,
                buy_asset: market.receive_asset(side).to_string(),
                sell_asset: pay_asset.to_string(),
                buy_amount,
                sell_amount,
            },
        ]);
        Ok(())
    }

    /// Take the whole remaining quantity of one resting order at its price.
    ///
    /// # Errors
    /// - `InvalidOrder` for an unknown id
    /// - `OrderNotOpen` if the order is filled or cancelled
    /// - `InvalidMarket` if its market is halted
    /// - `InsufficientAvailable` if `caller` cannot fund the counter-asset
    pub fn fill_order(&mut self, order_id: OrderId, caller: UserId) -> Result<SubmitReport> {
        let maker = self
            .orders
            .get(&order_id)
            .ok_or(ExchangeError::InvalidOrder(order_id))?;
        if !maker.is_open() {
            return Err(ExchangeError::OrderNotOpen {
                id: order_id,
                status: maker.status,
            });
        }
        let pair = maker.market.clone();
        let market = self.registry.resolve(&pair)?.clone();
        let taker_side = maker.side.opposite();
        let fill = matching::plan_fill(&market, &self.fees, taker_side, caller, maker, maker.remaining)?;

        let pay_asset = fill.taker_leg().asset.clone();
        let delivery = fill.taker_leg().amount;
        let available = self.ledger.balance(&pay_asset, caller).available;
        if available < delivery {
            return Err(ExchangeError::InsufficientAvailable {
                needed: delivery,
                available,
            });
        }

        self.ledger.lock(&pay_asset, caller, delivery)?;
        let now = Utc::now();
        let mut staged = Vec::with_capacity(2);
        let trade = self.execute(&market, fill, None, caller, taker_side, now, &mut staged)?;
        staged.push(ExchangeEvent::OrderBookChanged {
            side: taker_side.opposite(),
            market: pair.clone(),
            new_length: self.order_book_len(taker_side.opposite(), &pair),
        });

        let report = SubmitReport::new(order_id, OrderStatus::Filled, Decimal::ZERO, vec![trade]);
        self.commit(staged);
        Ok(report)
    }

    /// Apply one planned fill: settle both legs, refund price improvement,
    /// advance the maker, emit the trade.
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &mut self,
        market: &Market,
        fill: PlannedFill,
        taker_order_id: Option<OrderId>,
        taker: UserId,
        taker_side: OrderSide,
        now: DateTime<Utc>,
        staged: &mut Vec<ExchangeEvent>,
    ) -> Result<Trade> {
        self.ledger.settle(&fill.settlement)?;
        if !fill.refund.is_zero() {
            self.ledger
                .unlock(&fill.taker_leg().asset, taker, fill.refund)?;
        }

        let maker = self.orders.get_mut(&fill.maker_order_id).ok_or_else(|| {
            ExchangeError::invariant(format!("maker order {} vanished", fill.maker_order_id))
        })?;
        maker.apply_fill(fill.quantity, now);
        let (maker_side, maker_filled) = (maker.side, !maker.is_open());
        if maker_filled {
            self.book_mut(&market.pair)?
                .remove(maker_side, fill.maker_order_id);
        }

        let sequence = self.next_fill_seq;
        self.next_fill_seq += 1;
        let trade = Trade {
            id: TradeId::deterministic(sequence),
            sequence,
            market: market.pair.clone(),
            maker_order_id: fill.maker_order_id,
            taker_order_id,
            maker: fill.maker,
            taker,
            taker_side,
            price: fill.price,
            quantity: fill.quantity,
            quote_amount: fill.quote,
            fee: fill.fee.fee,
            fee_asset: fill.fee_asset.clone(),
            fee_recipient: fill.settlement.fee_recipient,
            executed_at: now,
        };
        let (buyer, seller) = trade.buyer_seller();
        tracing::debug!(
            %trade,
            maker_order = %fill.maker_order_id,
            %buyer,
            %seller,
            maker_filled,
            "Fill"
        );

        // Maker's point of view: it receives what the taker delivers.
        let (taker_leg, maker_leg) = (fill.taker_leg(), fill.maker_leg());
        staged.push(ExchangeEvent::Trade {
            order_id: fill.maker_order_id,
            taker_order_id,
            maker: fill.maker,
            taker,
            buy_asset: taker_leg.asset.clone(),
            sell_asset: maker_leg.asset.clone(),
            buy_amount: taker_leg.amount,
            sell_amount: maker_leg.amount,
            fee_amount: fill.fee.fee,
            fee_asset: fill.fee_asset.clone(),
        });
        Ok(trade)
    }

    fn book(&self, pair: &MarketPair) -> Result<&escrowdex_book::OrderBook> {
        self.books
            .get(pair)
            .ok_or_else(|| ExchangeError::invariant(format!("market {pair} has no book")))
    }

    fn book_mut(&mut self, pair: &MarketPair) -> Result<&mut escrowdex_book::OrderBook> {
        self.books
            .get_mut(pair)
            .ok_or_else(|| ExchangeError::invariant(format!("market {pair} has no book")))
    }
}
