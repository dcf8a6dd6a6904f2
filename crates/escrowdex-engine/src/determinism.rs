//! Replay digests.
//!
//! Replaying the same sequence of operations against a fresh exchange must
//! produce the same trades and the same events. These digests let two runs
//! be compared without diffing full payloads.

use std::fmt;

use escrowdex_types::{EventRecord, Result, Trade};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A SHA-256 digest, displayed as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HashRoot(pub [u8; 32]);

impl HashRoot {
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for HashRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Digest over a submission's trades, in execution order.
///
/// Covers ids, counterparties, price, quantity and fee. Timestamps are
/// excluded so that replays match.
#[must_use]
pub fn compute_trade_root(trades: &[Trade]) -> HashRoot {
    let mut hasher = Sha256::new();
    hasher.update(b"escrowdex:trade_root:v1:");
    hasher.update((trades.len() as u64).to_le_bytes());

    for trade in trades {
        hasher.update(trade.id.0.as_bytes());
        hasher.update(trade.sequence.to_le_bytes());
        hasher.update(trade.maker_order_id.0.to_le_bytes());
        hasher.update(trade.taker_order_id.map_or(0, |id| id.0).to_le_bytes());
        hasher.update(trade.maker.0.as_bytes());
        hasher.update(trade.taker.0.as_bytes());
        hasher.update(trade.price.normalize().to_string().as_bytes());
        hasher.update(trade.quantity.normalize().to_string().as_bytes());
        hasher.update(trade.fee.normalize().to_string().as_bytes());
        hasher.update(trade.fee_asset.as_bytes());
    }

    HashRoot(hasher.finalize().into())
}

#[must_use]
pub fn verify_trade_root(trades: &[Trade], expected: &HashRoot) -> bool {
    compute_trade_root(trades) == *expected
}

/// Digest over event records (sequence and payload, not timestamp).
///
/// # Errors
/// `Serialization` if an event cannot be encoded.
pub fn compute_event_digest(records: &[EventRecord]) -> Result<HashRoot> {
    let mut hasher = Sha256::new();
    hasher.update(b"escrowdex:event_digest:v1:");
    hasher.update((records.len() as u64).to_le_bytes());

    for record in records {
        hasher.update(record.sequence.to_le_bytes());
        hasher.update(serde_json::to_vec(&record.event)?);
    }

    Ok(HashRoot(hasher.finalize().into()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use escrowdex_types::*;
    use rust_decimal::Decimal;

    use super::*;

    fn make_trade(sequence: u64) -> Trade {
        Trade {
            id: TradeId::deterministic(sequence),
            sequence,
            market: MarketPair::new("ETH", "DAI"),
            maker_order_id: OrderId(1),
            taker_order_id: Some(OrderId(2)),
            maker: UserId::from_bytes([1; 16]),
            taker: UserId::from_bytes([2; 16]),
            taker_side: OrderSide::Buy,
            price: Decimal::new(2000, 0),
            quantity: Decimal::ONE,
            quote_amount: Decimal::new(2000, 0),
            fee: Decimal::new(200, 0),
            fee_asset: "0xdai".into(),
            fee_recipient: UserId::from_bytes([3; 16]),
            executed_at: Utc::now(),
        }
    }

    #[test]
    fn same_trades_same_root() {
        let a = vec![make_trade(1), make_trade(2)];
        let b = vec![make_trade(1), make_trade(2)];
        assert_eq!(compute_trade_root(&a), compute_trade_root(&b));
        assert!(verify_trade_root(&a, &compute_trade_root(&b)));
    }

    #[test]
    fn order_matters() {
        let root_ab = compute_trade_root(&[make_trade(1), make_trade(2)]);
        let root_ba = compute_trade_root(&[make_trade(2), make_trade(1)]);
        assert_ne!(root_ab, root_ba);
    }

    #[test]
    fn trailing_zeros_do_not_change_root() {
        let a = make_trade(1);
        let mut b = make_trade(1);
        b.price = Decimal::new(200_000, 2);
        assert_eq!(compute_trade_root(&[a]), compute_trade_root(&[b]));
    }

    #[test]
    fn hex_display() {
        let root = compute_trade_root(&[]);
        let s = root.to_string();
        assert_eq!(s.len(), 64);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn event_digest_ignores_timestamps() {
        let event = ExchangeEvent::MarketStatusChanged {
            market: MarketPair::new("ETH", "DAI"),
            enabled: false,
        };
        let a = EventRecord {
            sequence: 0,
            at: Utc::now(),
            event: event.clone(),
        };
        let mut b = a.clone();
        b.at = Utc::now() + chrono::Duration::seconds(5);
        assert_eq!(
            compute_event_digest(&[a.clone()]).unwrap(),
            compute_event_digest(&[b]).unwrap()
        );

        let mut c = a;
        c.sequence = 1;
        assert_ne!(
            compute_event_digest(&[c]).unwrap(),
            compute_event_digest(&[EventRecord {
                sequence: 0,
                at: Utc::now(),
                event,
            }])
            .unwrap()
        );
    }
}
