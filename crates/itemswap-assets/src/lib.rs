//! # itemswap-assets
//!
//! **Asset collaborators** consumed by the ItemSwap executor.
//!
//! ## Architecture
//!
//! The executor never owns balances. It moves assets through two narrow
//! capabilities ([`FungibleAsset`], [`ItemAsset`]) looked up by address:
//! 1. **FungibleLedger**: balances and allowances per (owner, spender)
//! 2. **ItemLedger**: per-unit ownership, per-unit and operator approvals
//! 3. **SharedAsset**: clone-able handle so embedders can observe a ledger
//!    the executor is mutating
//! 4. **AssetRegistry**: address -> collaborator, resolved once to an
//!    [`AssetClass`]
//!
//! ## Transfer Flow
//!
//! ```text
//! owner.approve(exchange) → executor.fill() → registry.fungible_mut(token)
//!     → check_transfer_from() → transfer_from() → [revert_transfer() on failure]
//! ```
//!
//! [`FungibleAsset`]: itemswap_types::FungibleAsset
//! [`ItemAsset`]: itemswap_types::ItemAsset
//! [`AssetClass`]: itemswap_types::AssetClass

pub mod fungible;
pub mod items;
pub mod registry;
pub mod shared;

pub use fungible::FungibleLedger;
pub use items::ItemLedger;
pub use registry::{AssetRegistry, Collaborator};
pub use shared::SharedAsset;
