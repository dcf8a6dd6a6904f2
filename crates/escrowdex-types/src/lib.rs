//! # escrowdex-types
//!
//! Shared types, errors, and configuration for the **escrowdex** exchange core.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`UserId`], [`TradeId`], [`MarketPair`]
//! - **Order model**: [`Order`], [`OrderSide`], [`OrderKind`], [`OrderStatus`]
//! - **Market model**: [`Market`]
//! - **Trade model**: [`Trade`]
//! - **Balance model**: [`BalanceEntry`], [`Asset`]
//! - **Events**: [`ExchangeEvent`], [`EventRecord`]
//! - **Configuration**: [`ExchangeConfig`], [`FeePolicy`]
//! - **Errors**: [`ExchangeError`] with `EX_ERR_` prefix codes
//! - **Constants**: precision limits and defaults

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod market;
pub mod numeric;
pub mod order;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use escrowdex_types::{Order, OrderSide, Trade, ExchangeError, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use market::*;
pub use order::*;
pub use trade::*;

// Constants and numeric helpers are accessed via their module path
// (`escrowdex_types::constants::FOO`) to avoid name collisions.
