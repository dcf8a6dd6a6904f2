//! System-wide constants for the escrowdex exchange core.

use rust_decimal::Decimal;

/// Maximum decimal precision for prices (quote units per base unit).
pub const PRICE_PRECISION: u32 = 8;

/// Maximum decimal precision for order quantities (base units).
pub const QTY_PRECISION: u32 = 8;

/// Maximum decimal precision for ledger amounts.
///
/// Equals `PRICE_PRECISION + QTY_PRECISION`, so a `quantity × price`
/// product never needs more decimals than a ledger amount carries.
pub const AMOUNT_PRECISION: u32 = PRICE_PRECISION + QTY_PRECISION;

/// Ceiling on the total custody of any one asset (10^12 units).
///
/// `Decimal` holds at most 28 significant digits. With
/// [`AMOUNT_PRECISION`] decimals that leaves 12 integer digits, so every
/// balance, sum and difference at or below this ceiling is exact.
pub const MAX_ASSET_SUPPLY: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Fee percentages are expressed on a 0–100 scale (`10` = 10%).
pub const FEE_PERCENT_SCALE: Decimal = Decimal::ONE_HUNDRED;

/// Maximum decimal precision accepted for the fee percentage itself.
pub const FEE_PERCENT_PRECISION: u32 = 4;

/// First order id ever issued. Ids are never reused.
pub const FIRST_ORDER_ID: u64 = 1;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "escrowdex";
