//! # escrowdex-book
//!
//! **Pure order book data structure** for the escrowdex matching engine.
//!
//! One [`BookSide`] per (market, side) keeps resting orders in strict
//! price-time priority:
//!
//! - **Bids** (buys): highest price first
//! - **Asks** (sells): lowest price first
//! - **Ties**: ascending order id (first come, first served)
//!
//! The book stores only ordering keys. Order state (remaining quantity,
//! status) and funds live elsewhere; the book has no business logic.

pub mod book_side;
pub mod orderbook;
pub mod price_level;

pub use book_side::{BookEntry, BookSide};
pub use orderbook::OrderBook;
pub use price_level::PriceLevel;
