//! Thread-safe handle over one executor.
//!
//! Every call holds the lock for its whole duration, so two concurrent fills
//! of the same order are ordered: the first commits, the second validates
//! against the updated ledger and gets `ERROR_INVALID_FILL`.

use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::Address;
use itemswap_core::Validation;
use itemswap_types::{Order, OrderHash, Result, SignatureTriple, SwapCode, SwapError};

use crate::executor::{SwapExecutor, SwapOutcome};
use crate::ledger::FillLedger;

/// `Clone + Send + Sync` wrapper around a [`SwapExecutor`].
pub struct SerializedExecutor<L: FillLedger> {
    inner: Arc<Mutex<SwapExecutor<L>>>,
}

impl<L: FillLedger> Clone for SerializedExecutor<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: FillLedger> SerializedExecutor<L> {
    #[must_use]
    pub fn new(executor: SwapExecutor<L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(executor)),
        }
    }

    /// Run `f` under the lock.
    ///
    /// # Errors
    /// `Internal` if a previous holder panicked mid-operation. The executor
    /// may then hold a half-applied fill, so it is not reused.
    pub fn with<R>(&self, f: impl FnOnce(&mut SwapExecutor<L>) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    pub fn hash(&self, order: &Order) -> Result<OrderHash> {
        self.with(|ex| ex.hash(order))
    }

    pub fn is_consumed(&self, hash: &OrderHash) -> Result<bool> {
        self.with(|ex| ex.is_consumed(hash))
    }

    pub fn validate(
        &self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<Validation> {
        self.with(|ex| ex.validate(order, signature, caller))
    }

    pub fn simulate_fill(
        &self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<SwapCode> {
        self.with(|ex| ex.simulate_fill(order, signature, caller))?
    }

    pub fn fill(
        &self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<SwapCode> {
        self.with(|ex| ex.fill(order, signature, caller))?
    }

    pub fn fill_with_receipt(
        &self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<SwapOutcome> {
        self.with(|ex| ex.fill_with_receipt(order, signature, caller))?
    }

    pub fn cancel(
        &self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<SwapCode> {
        self.with(|ex| ex.cancel(order, signature, caller))?
    }

    pub fn cancel_with_receipt(
        &self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<SwapOutcome> {
        self.with(|ex| ex.cancel_with_receipt(order, signature, caller))?
    }

    /// Current ledger commitment.
    pub fn ledger_digest(&self) -> Result<[u8; 32]> {
        self.with(|ex| ex.ledger().digest())
    }

    fn lock(&self) -> Result<MutexGuard<'_, SwapExecutor<L>>> {
        self.inner
            .lock()
            .map_err(|_| SwapError::Internal("executor lock poisoned".to_string()))
    }
}

impl<L: FillLedger> std::fmt::Debug for SerializedExecutor<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializedExecutor")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}
