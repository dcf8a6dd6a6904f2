//! Input validation for exact decimal bookkeeping.
//!
//! Prices, quantities and ledger amounts carry bounded precision, and the
//! arithmetic helpers refuse any result `Decimal` would have to round.
//! Anything that cannot be carried exactly is an error, never a silently
//! rounded value.

use rust_decimal::Decimal;

use crate::constants::{AMOUNT_PRECISION, MAX_ASSET_SUPPLY, PRICE_PRECISION, QTY_PRECISION};
use crate::{ExchangeError, Result};

fn within_precision(value: Decimal, precision: u32) -> bool {
    value.normalize().scale() <= precision
}

/// A strictly positive quantity with at most [`QTY_PRECISION`] decimals,
/// returned normalized.
pub fn validate_quantity(qty: Decimal) -> Result<Decimal> {
    if qty <= Decimal::ZERO || !within_precision(qty, QTY_PRECISION) {
        return Err(ExchangeError::InvalidQuantity(qty));
    }
    Ok(qty.normalize())
}

/// A strictly positive price with at most [`PRICE_PRECISION`] decimals,
/// returned normalized.
pub fn validate_price(price: Decimal) -> Result<Decimal> {
    if price <= Decimal::ZERO || !within_precision(price, PRICE_PRECISION) {
        return Err(ExchangeError::InvalidPrice(price));
    }
    Ok(price.normalize())
}

/// A strictly positive ledger amount with at most [`AMOUNT_PRECISION`]
/// decimals and no larger than [`MAX_ASSET_SUPPLY`], returned normalized.
pub fn validate_amount(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO
        || amount > MAX_ASSET_SUPPLY
        || !within_precision(amount, AMOUNT_PRECISION)
    {
        return Err(ExchangeError::InvalidAmount(amount));
    }
    Ok(amount.normalize())
}

/// Exact `a × b`.
///
/// `Decimal` multiplication drops trailing digits once the product needs
/// more than 28 significant digits; such a product is reported as
/// [`ExchangeError::Overflow`] like one that does not fit at all.
pub fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    let product = a.checked_mul(b).ok_or(ExchangeError::Overflow)?;
    if product.scale() < a.scale() + b.scale() {
        return Err(ExchangeError::Overflow);
    }
    Ok(product)
}

/// Exact `a + b`; `Overflow` if the sum would be rounded.
pub fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal> {
    let sum = a.checked_add(b).ok_or(ExchangeError::Overflow)?;
    if sum.scale() < a.scale().max(b.scale()) {
        return Err(ExchangeError::Overflow);
    }
    Ok(sum)
}

/// Exact `a − b`; `Overflow` if the difference would be rounded.
pub fn checked_sub(a: Decimal, b: Decimal) -> Result<Decimal> {
    checked_add(a, -b)
}
