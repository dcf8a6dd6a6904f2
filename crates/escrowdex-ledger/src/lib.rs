//! # escrowdex-ledger
//!
//! **Balance ledger** for the escrowdex exchange core: the single source of
//! truth for funds.
//!
//! ## Architecture
//!
//! 1. **AssetLedger**: the external token ledger (transfer / approve /
//!    balanceOf). The core only calls into it to pull and push funds.
//! 2. **BalanceLedger**: per-(asset, owner) available/locked accounting.
//! 3. **Settlement**: the two legs of one trade, applied atomically.
//! 4. **SupplyConservation**: `Σ(available + locked) == Σdeposits − Σwithdrawals`.
//!
//! ## Funds Flow
//!
//! ```text
//! AssetLedger ──deposit──▶ available ──lock──▶ locked ──settle──▶ counterparty available
//!      ▲                       │   ◀──unlock──                      + fee account available
//!      └───────withdraw────────┘
//! ```

pub mod asset_ledger;
pub mod balance_ledger;
pub mod settlement;
pub mod supply_conservation;

pub use asset_ledger::{AssetLedger, MemoryAssetLedger};
pub use balance_ledger::BalanceLedger;
pub use settlement::{Settlement, SettlementLeg};
pub use supply_conservation::{AssetFlow, SupplyConservation};
