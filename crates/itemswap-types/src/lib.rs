//! # itemswap-types
//!
//! Shared types, errors, and configuration for the **ItemSwap** settlement engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderHash`], plus the [`Address`] / [`U256`] / [`B256`] primitives
//! - **Order model**: [`Order`], [`Taker`], [`AssetClass`]
//! - **Signatures**: [`SignatureTriple`], [`SigningScheme`]
//! - **Collaborator capabilities**: [`FungibleAsset`], [`ItemAsset`], [`AssetDirectory`]
//! - **Configuration**: [`SwapConfig`], [`AssetEntry`], [`LedgerConfig`]
//! - **Codes and errors**: [`SwapCode`] (stable protocol codes), [`SwapError`]
//!   with `SWAP_ERR_` prefix, [`TransferError`]
//! - **Constants**: curve bounds, signing prefixes, defaults

pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;
pub mod signature;

pub use asset::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use signature::*;

pub use alloy_primitives::{Address, B256, U256};

// Constants are accessed via `itemswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
