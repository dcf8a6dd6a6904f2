//! # escrowdex-engine
//!
//! The exchange core proper. [`Exchange`] owns the balance ledger, the
//! market registry, one order book per market and every order ever placed,
//! and exposes the public operations:
//!
//! - **Custody**: `deposit`, `withdraw`, `withdraw_to`
//! - **Markets**: `register_market`, `set_market_enabled`
//! - **Trading**: `limit_order`, `market_order`, `cancel_order`, `fill_order`
//!
//! Each operation is all-or-nothing. It validates and plans first, then
//! mutates, then appends its events to the log.
//!
//! ## Matching
//!
//! Continuous price-time priority. An incoming order walks the opposite
//! side best-first and trades at each maker's price while the price is
//! acceptable; whatever is left rests in the book.

pub mod determinism;
pub mod event_log;
pub mod exchange;
pub mod fees;
mod matching;
pub mod registry;
pub mod report;

pub use determinism::{HashRoot, compute_event_digest, compute_trade_root, verify_trade_root};
pub use event_log::EventLog;
pub use exchange::Exchange;
pub use fees::{FeeCalculator, FeeQuote};
pub use registry::{MarketRegistry, RegistrarCheck, SingleRegistrar};
pub use report::SubmitReport;
