//! Shared fixture for the integration tests.

#![allow(dead_code)]

use escrowdex_engine::Exchange;
use escrowdex_ledger::MemoryAssetLedger;
use escrowdex_types::*;
use rust_decimal::Decimal;

pub const BASE: &str = "token-a";
pub const QUOTE: &str = "token-b";

pub fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An exchange with one registered market (A/B) and a token ledger.
pub struct Harness {
    pub ex: Exchange,
    pub token: MemoryAssetLedger,
    pub cfg: ExchangeConfig,
    pub pair: MarketPair,
}

impl Harness {
    pub fn new(fee_percent: Decimal) -> Self {
        Self::with_policy(fee_percent, FeePolicy::TakerPayment)
    }

    pub fn with_policy(fee_percent: Decimal, policy: FeePolicy) -> Self {
        init_tracing();
        let cfg = ExchangeConfig::new(
            UserId::from_bytes([0xC0; 16]),
            UserId::from_bytes([0xAD; 16]),
            UserId::from_bytes([0xFE; 16]),
            fee_percent,
        )
        .with_fee_policy(policy);
        let mut ex = Exchange::new(cfg.clone()).expect("valid config");
        let pair = ex
            .register_market(BASE, QUOTE, "A", "B", cfg.registrar)
            .expect("market registers");
        Self {
            ex,
            token: MemoryAssetLedger::new(),
            cfg,
            pair,
        }
    }

    pub fn fee_account(&self) -> UserId {
        self.cfg.fee_account
    }

    /// Mint, approve and deposit `amount` of `asset` for `user`.
    pub fn fund(&mut self, asset: &str, user: UserId, amount: Decimal) {
        self.token.mint(asset, user, amount);
        self.token.approve(asset, user, self.cfg.custodian, amount);
        self.ex
            .deposit(&mut self.token, asset, amount, user)
            .expect("deposit succeeds");
    }

    pub fn funded(&mut self, asset: &str, amount: Decimal) -> UserId {
        let user = UserId::new();
        self.fund(asset, user, amount);
        user
    }

    pub fn limit(&mut self, user: UserId, side: OrderSide, qty: Decimal, price: Decimal) -> OrderId {
        let pair = self.pair.clone();
        self.ex
            .limit_order(qty, price, side, &pair, user)
            .expect("order accepted")
            .order_id
    }

    pub fn available(&self, asset: &str, user: UserId) -> Decimal {
        self.ex.balance_of(asset, user).available
    }

    pub fn total(&self, asset: &str, user: UserId) -> Decimal {
        self.ex.balance_of(asset, user).total()
    }

    /// Locked balance of every `(asset, user)` equals the reservations of
    /// that user's open orders.
    pub fn assert_reservations_exact(&self, users: &[UserId]) {
        for &user in users {
            for (asset, side) in [(QUOTE, OrderSide::Buy), (BASE, OrderSide::Sell)] {
                let reserved = self
                    .ex
                    .open_orders()
                    .filter(|o| o.owner == user && o.side == side)
                    .map(Order::reserved)
                    .sum::<Result<Decimal>>()
                    .expect("open reservations are representable");
                assert_eq!(
                    self.ex.balance_of(asset, user).locked,
                    reserved,
                    "locked {asset} of {user} must equal its open reservations"
                );
            }
        }
    }
}
