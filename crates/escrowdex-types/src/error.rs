//! Error types for the escrowdex exchange core.
//!
//! All errors use the `EX_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by category:
//! - 1xx: Validation errors
//! - 2xx: Funds errors
//! - 3xx: Authorization errors
//! - 4xx: Order state errors
//! - 5xx: External asset ledger errors
//! - 9xx: Internal / invariant errors
//!
//! Every error aborts the whole operation with no state change. None of them
//! are retried inside the core.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{MarketPair, OrderId, OrderStatus};

/// Coarse classification of an [`ExchangeError`].
///
/// Lets callers distinguish "try a smaller amount" from "market doesn't
/// exist" from "not your order" without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    Funds,
    Authorization,
    State,
    External,
    Internal,
}

/// Central error enum for all exchange operations.
#[derive(Debug, Error)]
pub enum ExchangeError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// The market is not registered or is not enabled for trading.
    #[error("EX_ERR_100: Invalid market: {market}")]
    InvalidMarket { market: String },

    /// The order id does not exist in the addressed (market, side) book.
    #[error("EX_ERR_101: Invalid order: {0}")]
    InvalidOrder(OrderId),

    /// Zero, negative, or over-precise quantity.
    #[error("EX_ERR_102: Invalid quantity: {0}")]
    InvalidQuantity(Decimal),

    /// Zero, negative, or over-precise price.
    #[error("EX_ERR_103: Invalid price: {0}")]
    InvalidPrice(Decimal),

    /// Zero, negative, or over-precise ledger amount.
    #[error("EX_ERR_104: Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// A market with this symbol pair is already registered.
    #[error("EX_ERR_105: Market already registered: {0}")]
    MarketAlreadyRegistered(MarketPair),

    /// An order with this id is already resting in the book.
    #[error("EX_ERR_106: Order already in book: {0}")]
    DuplicateOrder(OrderId),

    // =================================================================
    // Funds Errors (2xx)
    // =================================================================
    /// The owner's external balance is below the requested deposit.
    #[error("EX_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// The allowance granted to the exchange is below the requested deposit.
    #[error("EX_ERR_201: Insufficient allowance: need {needed}, allowed {allowed}")]
    InsufficientAllowance { needed: Decimal, allowed: Decimal },

    /// Not enough unreserved funds for a withdrawal or a new reservation.
    #[error("EX_ERR_202: Insufficient available funds: need {needed}, have {available}")]
    InsufficientAvailable { needed: Decimal, available: Decimal },

    /// Not enough locked funds to unlock or settle.
    #[error("EX_ERR_203: Insufficient locked funds: need {needed}, have {locked}")]
    InsufficientLocked { needed: Decimal, locked: Decimal },

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// The caller may not perform this operation.
    #[error("EX_ERR_300: Not authorized: {reason}")]
    NotAuthorized { reason: String },

    // =================================================================
    // State Errors (4xx)
    // =================================================================
    /// The order is Filled or Cancelled and cannot be filled.
    #[error("EX_ERR_400: Order {id} is not open (status {status})")]
    OrderNotOpen { id: OrderId, status: OrderStatus },

    // =================================================================
    // External Ledger Errors (5xx)
    // =================================================================
    /// The external asset ledger rejected a transfer.
    #[error("EX_ERR_500: Asset transfer failed: {reason}")]
    AssetTransferFailed { reason: String },

    // =================================================================
    // Internal Errors (9xx)
    // =================================================================
    /// Supply conservation invariant violated.
    #[error("EX_ERR_900: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// An internal bookkeeping invariant does not hold.
    #[error("EX_ERR_901: Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    /// Decimal arithmetic overflowed.
    #[error("EX_ERR_902: Arithmetic overflow")]
    Overflow,

    /// Configuration error (invalid config file, bad values, etc.).
    #[error("EX_ERR_903: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("EX_ERR_904: Serialization error: {0}")]
    Serialization(String),
}

impl ExchangeError {
    /// Shorthand for [`ExchangeError::InvalidMarket`].
    pub fn invalid_market(market: &MarketPair) -> Self {
        Self::InvalidMarket {
            market: market.symbol(),
        }
    }

    /// Shorthand for [`ExchangeError::NotAuthorized`].
    pub fn not_authorized(reason: impl Into<String>) -> Self {
        Self::NotAuthorized {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ExchangeError::InvariantViolation`].
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// The category this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidMarket { .. }
            | Self::InvalidOrder(_)
            | Self::InvalidQuantity(_)
            | Self::InvalidPrice(_)
            | Self::InvalidAmount(_)
            | Self::MarketAlreadyRegistered(_)
            | Self::DuplicateOrder(_) => ErrorCategory::Validation,
            Self::InsufficientBalance { .. }
            | Self::InsufficientAllowance { .. }
            | Self::InsufficientAvailable { .. } => ErrorCategory::Funds,
            Self::NotAuthorized { .. } => ErrorCategory::Authorization,
            Self::OrderNotOpen { .. } => ErrorCategory::State,
            Self::AssetTransferFailed { .. } => ErrorCategory::External,
            Self::InsufficientLocked { .. }
            | Self::SupplyInvariantViolation { .. }
            | Self::InvariantViolation { .. }
            | Self::Overflow
            | Self::Configuration(_)
            | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ExchangeError>;

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = ExchangeError::InvalidOrder(OrderId(18));
        let msg = format!("{err}");
        assert!(msg.starts_with("EX_ERR_101"), "Got: {msg}");
        assert!(msg.contains("18"));
    }

    #[test]
    fn insufficient_available_display() {
        let err = ExchangeError::InsufficientAvailable {
            needed: Decimal::new(100, 0),
            available: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("EX_ERR_202"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn order_not_open_mentions_status() {
        let err = ExchangeError::OrderNotOpen {
            id: OrderId(1),
            status: OrderStatus::Filled,
        };
        assert!(format!("{err}").contains("FILLED"));
    }

    #[test]
    fn categories_separate_user_mistakes() {
        assert_eq!(
            ExchangeError::invalid_market(&MarketPair::new("A", "B")).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            ExchangeError::InsufficientAllowance {
                needed: Decimal::ONE,
                allowed: Decimal::ZERO,
            }
            .category(),
            ErrorCategory::Funds
        );
        assert_eq!(
            ExchangeError::not_authorized("nope").category(),
            ErrorCategory::Authorization
        );
        assert_eq!(
            ExchangeError::invariant("broken").category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn all_errors_have_ex_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(ExchangeError::Overflow),
            Box::new(ExchangeError::InvalidQuantity(Decimal::ZERO)),
            Box::new(ExchangeError::MarketAlreadyRegistered(MarketPair::new("A", "B"))),
            Box::new(ExchangeError::Configuration("test".into())),
            Box::new(ExchangeError::AssetTransferFailed {
                reason: "x".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("EX_ERR_"),
                "Error missing EX_ERR_ prefix: {msg}"
            );
        }
    }
}
