//! What a trading call hands back to its caller.

use escrowdex_types::{OrderId, OrderStatus, Trade};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::determinism::{HashRoot, compute_trade_root};

/// Outcome of a limit, market or direct-fill submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReport {
    /// The submitted order, or the filled maker order for a direct fill.
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub remaining: Decimal,
    /// Fills in execution order.
    pub trades: Vec<Trade>,
    pub trade_root: HashRoot,
}

impl SubmitReport {
    #[must_use]
    pub fn new(order_id: OrderId, status: OrderStatus, remaining: Decimal, trades: Vec<Trade>) -> Self {
        let trade_root = compute_trade_root(&trades);
        Self {
            order_id,
            status,
            remaining,
            trades,
            trade_root,
        }
    }

    /// Base quantity executed across all fills.
    #[must_use]
    pub fn filled(&self) -> Decimal {
        self.trades.iter().map(|t| t.quantity).sum()
    }
}
