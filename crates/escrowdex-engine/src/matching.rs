//! Fill planning.
//!
//! Matching runs in two phases. Planning walks the opposite book read-only
//! and decides every fill, settlement leg and fee; only then does the
//! exchange apply the plan. Anything that can fail for a caller-facing
//! reason fails during planning, before a single balance moves.

use std::collections::HashMap;

use escrowdex_book::BookSide;
use escrowdex_ledger::{Settlement, SettlementLeg};
use escrowdex_types::numeric::checked_mul;
use escrowdex_types::{
    Asset, ExchangeError, FeePolicy, Market, Order, OrderId, OrderSide, Result, UserId,
};
use rust_decimal::Decimal;

use crate::fees::{FeeCalculator, FeeQuote};

/// A fill decided during planning, not yet applied.
#[derive(Debug, Clone)]
pub(crate) struct PlannedFill {
    pub maker_order_id: OrderId,
    pub maker: UserId,
    /// The maker's price.
    pub price: Decimal,
    pub quantity: Decimal,
    pub quote: Decimal,
    pub fee: FeeQuote,
    pub fee_asset: Asset,
    /// `[taker delivers, maker delivers]`.
    pub settlement: Settlement,
    /// Locked quote released back to a buy taker that traded below its limit.
    pub refund: Decimal,
}

impl PlannedFill {
    pub fn taker_leg(&self) -> &SettlementLeg {
        &self.settlement.legs[0]
    }

    pub fn maker_leg(&self) -> &SettlementLeg {
        &self.settlement.legs[1]
    }
}

/// Walk `book` best-first and plan fills for `taker` until it is exhausted
/// or the next maker price is unacceptable.
pub(crate) fn plan_crossing(
    book: &BookSide,
    orders: &HashMap<OrderId, Order>,
    taker: &Order,
    market: &Market,
    fees: &FeeCalculator,
) -> Result<Vec<PlannedFill>> {
    let mut remaining = taker.remaining;
    let mut fills = Vec::new();

    for entry in book.iter() {
        if remaining.is_zero() || !taker.accepts(entry.price) {
            break;
        }
        let maker = orders.get(&entry.id).ok_or_else(|| {
            ExchangeError::invariant(format!("resting order {} has no record", entry.id))
        })?;
        let quantity = remaining.min(maker.remaining);
        let mut fill = plan_fill(market, fees, taker.side, taker.owner, maker, quantity)?;
        if taker.side == OrderSide::Buy {
            fill.refund = checked_mul(quantity, taker.price - fill.price)?;
        }
        remaining -= quantity;
        fills.push(fill);
    }
    Ok(fills)
}

/// Plan one fill of `quantity` against `maker` at the maker's price.
pub(crate) fn plan_fill(
    market: &Market,
    fees: &FeeCalculator,
    taker_side: OrderSide,
    taker: UserId,
    maker: &Order,
    quantity: Decimal,
) -> Result<PlannedFill> {
    let price = maker.price;
    let quote = checked_mul(quantity, price)?;
    let (taker_pays, maker_pays) = match taker_side {
        OrderSide::Buy => (quote, quantity),
        OrderSide::Sell => (quantity, quote),
    };
    let taker_asset = market.pay_asset(taker_side);
    let maker_asset = market.receive_asset(taker_side);

    let taker_leg = SettlementLeg::new(taker_asset, taker, maker.owner, taker_pays);
    let maker_leg = SettlementLeg::new(maker_asset, maker.owner, taker, maker_pays);

    let (fee, fee_asset, taker_leg, maker_leg) = match fees.policy() {
        FeePolicy::TakerPayment => {
            let fee = fees.quote(taker_pays)?;
            (fee, taker_asset, taker_leg.with_fee(fee.fee), maker_leg)
        }
        FeePolicy::TakerProceeds => {
            let fee = fees.quote(maker_pays)?;
            (fee, maker_asset, taker_leg, maker_leg.with_fee(fee.fee))
        }
    };

    Ok(PlannedFill {
        maker_order_id: maker.id,
        maker: maker.owner,
        price,
        quantity,
        quote,
        fee,
        fee_asset: fee_asset.to_string(),
        settlement: Settlement::new(taker_leg, maker_leg, fees.recipient()),
        refund: Decimal::ZERO,
    })
}
