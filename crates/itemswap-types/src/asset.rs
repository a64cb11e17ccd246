//! Capabilities the settlement engine consumes from the two asset ledgers.
//!
//! The engine never owns balances or ownership records. It only asks a
//! collaborator to move assets that an owner has already authorized the
//! engine (the `spender`) to move, and, when a later leg of the same swap
//! fails, to undo a transfer it just made.
//!
//! Every method takes the spender explicitly so one collaborator can serve
//! several engines.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::{AssetClass, TransferError};

/// Balance-token ledger.
pub trait FungibleAsset: Send {
    /// Would [`transfer_from`](Self::transfer_from) succeed right now?
    /// Must not mutate anything.
    fn check_transfer_from(
        &self,
        spender: Address,
        owner: Address,
        recipient: Address,
        quantity: U256,
    ) -> Result<(), TransferError>;

    /// Move `quantity` from `owner` to `recipient`, consuming `spender`'s
    /// allowance. Either fully succeeds or changes nothing.
    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        quantity: U256,
    ) -> Result<(), TransferError>;

    /// Compensate a successful `transfer_from` with identical arguments:
    /// restore both balances and the consumed allowance.
    fn revert_transfer(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        quantity: U256,
    ) -> Result<(), TransferError>;
}

/// Per-unit item ledger.
pub trait ItemAsset: Send {
    /// Would [`transfer_from`](Self::transfer_from) succeed right now?
    /// Must not mutate anything.
    fn check_transfer_from(
        &self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> Result<(), TransferError>;

    /// Move unit `unit_id` from `owner` to `recipient`. `spender` must be the
    /// owner, an operator for the owner, or approved for this unit.
    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> Result<(), TransferError>;

    /// Compensate a successful `transfer_from` with identical arguments:
    /// return the unit to `owner` and restore any per-unit approval the
    /// transfer cleared.
    fn revert_transfer(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> Result<(), TransferError>;
}

/// Resolves a token address to its asset class.
pub trait AssetDirectory {
    /// `None` for addresses that are not a recognized collaborator.
    fn class_of(&self, token: &Address) -> Option<AssetClass>;
}

impl<S: std::hash::BuildHasher> AssetDirectory for HashMap<Address, AssetClass, S> {
    fn class_of(&self, token: &Address) -> Option<AssetClass> {
        self.get(token).copied()
    }
}
