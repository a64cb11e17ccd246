//! Clone-able handle over a collaborator.
//!
//! The registry owns its collaborators as boxed trait objects. Wrapping a
//! ledger in [`SharedAsset`] lets the embedder keep a second handle to read
//! balances or mint while the executor holds the other.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy_primitives::{Address, U256};
use itemswap_types::{FungibleAsset, ItemAsset, TransferError};

/// `Arc<Mutex<T>>` that forwards the collaborator traits of `T`.
#[derive(Debug, Default)]
pub struct SharedAsset<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for SharedAsset<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedAsset<T> {
    #[must_use]
    pub fn new(asset: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(asset)),
        }
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.lock())
    }

    // Every mutation leaves the ledger consistent before it can panic, so a
    // poisoned lock still guards valid state.
    fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: FungibleAsset> FungibleAsset for SharedAsset<T> {
    fn check_transfer_from(
        &self,
        spender: Address,
        owner: Address,
        recipient: Address,
        quantity: U256,
    ) -> Result<(), TransferError> {
        self.lock()
            .check_transfer_from(spender, owner, recipient, quantity)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        quantity: U256,
    ) -> Result<(), TransferError> {
        self.lock().transfer_from(spender, owner, recipient, quantity)
    }

    fn revert_transfer(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        quantity: U256,
    ) -> Result<(), TransferError> {
        self.lock()
            .revert_transfer(spender, owner, recipient, quantity)
    }
}

impl<T: ItemAsset> ItemAsset for SharedAsset<T> {
    fn check_transfer_from(
        &self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> Result<(), TransferError> {
        self.lock()
            .check_transfer_from(spender, owner, recipient, unit_id)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> Result<(), TransferError> {
        self.lock().transfer_from(spender, owner, recipient, unit_id)
    }

    fn revert_transfer(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> Result<(), TransferError> {
        self.lock().revert_transfer(spender, owner, recipient, unit_id)
    }
}
