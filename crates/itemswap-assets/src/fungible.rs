//! In-memory fungible balance ledger.
//!
//! Tracks per-owner balances and per-(owner, spender) allowances.
//! All mutations are atomic: either the full operation succeeds or
//! the ledger is unchanged.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use itemswap_types::{FungibleAsset, TransferError};

/// Fungible token ledger with ERC-20 style allowances.
///
/// An allowance of `U256::MAX` is treated as unlimited and is never
/// decremented by `transfer_from`.
#[derive(Debug, Clone, Default)]
pub struct FungibleLedger {
    name: String,
    balances: HashMap<Address, U256>,
    /// (owner, spender) -> remaining allowance.
    allowances: HashMap<(Address, Address), U256>,
    total_supply: U256,
}

impl FungibleLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create `amount` new tokens for `to`.
    ///
    /// # Errors
    /// `Overflow` if total supply would exceed `U256::MAX`.
    pub fn mint(&mut self, to: Address, amount: U256) -> Result<(), TransferError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TransferError::Overflow(to))?;
        // Balances sum to total supply, so this cannot overflow.
        *self.balances.entry(to).or_default() += amount;
        self.total_supply = supply;
        Ok(())
    }

    /// Set `spender`'s allowance over `owner`'s balance (overwrites).
    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    /// Holder-initiated transfer; no allowance involved.
    ///
    /// # Errors
    /// `InsufficientBalance` if `owner` holds less than `amount`.
    pub fn transfer(
        &mut self,
        owner: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        check_recipient(recipient)?;
        self.check_balance(owner, amount)?;
        self.move_balance(owner, recipient, amount);
        Ok(())
    }

    #[must_use]
    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Number of holders with a non-zero balance.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.balances.values().filter(|b| !b.is_zero()).count()
    }

    fn check_balance(&self, owner: Address, amount: U256) -> Result<(), TransferError> {
        let available = self.balance_of(owner);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        Ok(())
    }

    fn check_allowance(
        &self,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(TransferError::InsufficientAllowance {
                needed: amount,
                allowed,
            });
        }
        Ok(())
    }

    /// Caller has already checked `from` holds `amount`.
    fn move_balance(&mut self, from: Address, to: Address, amount: U256) {
        if from == to {
            return;
        }
        if let Some(balance) = self.balances.get_mut(&from) {
            *balance -= amount;
            if balance.is_zero() {
                self.balances.remove(&from);
            }
        }
        *self.balances.entry(to).or_default() += amount;
    }
}

impl FungibleAsset for FungibleLedger {
    fn check_transfer_from(
        &self,
        spender: Address,
        owner: Address,
        recipient: Address,
        quantity: U256,
    ) -> Result<(), TransferError> {
        check_recipient(recipient)?;
        self.check_allowance(owner, spender, quantity)?;
        self.check_balance(owner, quantity)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        quantity: U256,
    ) -> Result<(), TransferError> {
        self.check_transfer_from(spender, owner, recipient, quantity)?;

        let allowed = self.allowance(owner, spender);
        if allowed != U256::MAX {
            self.approve(owner, spender, allowed - quantity);
        }
        self.move_balance(owner, recipient, quantity);
        Ok(())
    }

    fn revert_transfer(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        quantity: U256,
    ) -> Result<(), TransferError> {
        self.check_balance(recipient, quantity)?;

        let allowed = self.allowance(owner, spender);
        if allowed != U256::MAX {
            let restored = allowed
                .checked_add(quantity)
                .ok_or(TransferError::Overflow(spender))?;
            self.approve(owner, spender, restored);
        }
        self.move_balance(recipient, owner, quantity);
        tracing::debug!(
            token = %self.name,
            %owner,
            %recipient,
            %quantity,
            "Fungible transfer reverted"
        );
        Ok(())
    }
}

pub(crate) fn check_recipient(recipient: Address) -> Result<(), TransferError> {
    if recipient.is_zero() {
        return Err(TransferError::Rejected(
            "transfer to the zero address".to_string(),
        ));
    }
    Ok(())
}
