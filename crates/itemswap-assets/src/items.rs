//! In-memory item ledger: one owner per unit id.
//!
//! A spender may move a unit when it is the owner, an operator approved for
//! all of the owner's units, or the per-unit approved address. A transfer
//! clears the per-unit approval, which `revert_transfer` restores.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, U256};
use itemswap_types::{ItemAsset, TransferError};

use crate::fungible::check_recipient;

/// Item token ledger with ERC-721 style approvals.
#[derive(Debug, Clone, Default)]
pub struct ItemLedger {
    name: String,
    owners: HashMap<U256, Address>,
    approvals: HashMap<U256, Address>,
    /// (owner, operator) pairs.
    operators: HashSet<(Address, Address)>,
    uris: HashMap<U256, String>,
    /// Per-unit approval cleared by the most recent transfer of that unit.
    cleared: HashMap<U256, Address>,
}

impl ItemLedger {
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

    /// Create unit `unit_id` owned by `to`.
    ///
    /// # Errors
    /// `Rejected` if the unit already exists or `to` is the zero address.
    pub fn mint(&mut self, to: Address, unit_id: U256) -> Result<(), TransferError> {
        check_recipient(to)?;
        if self.owners.contains_key(&unit_id) {
            return Err(TransferError::Rejected(format!(
                "unit {unit_id} already minted"
            )));
        }
        self.owners.insert(unit_id, to);
        Ok(())
    }

    /// Mint several units with metadata URIs in one step. Nothing is minted
    /// unless every unit can be.
    ///
    /// # Errors
    /// `Rejected` on length mismatch, duplicate ids, or any already-minted id.
    pub fn mass_mint(
        &mut self,
        to: Address,
        unit_ids: &[U256],
        uris: &[&str],
    ) -> Result<(), TransferError> {
        check_recipient(to)?;
        if unit_ids.len() != uris.len() {
            return Err(TransferError::Rejected(format!(
                "{} unit ids but {} uris",
                unit_ids.len(),
                uris.len()
            )));
        }
        let mut batch = HashSet::with_capacity(unit_ids.len());
        for id in unit_ids {
            if !batch.insert(*id) || self.owners.contains_key(id) {
                return Err(TransferError::Rejected(format!("unit {id} already minted")));
            }
        }
        for (id, uri) in unit_ids.iter().zip(uris) {
            self.owners.insert(*id, to);
            self.uris.insert(*id, (*uri).to_string());
        }
        Ok(())
    }

    /// Destroy a unit. Only the owner may burn.
    ///
    /// # Errors
    /// `UnknownUnit` or `NotOwner`.
    pub fn burn(&mut self, owner: Address, unit_id: U256) -> Result<(), TransferError> {
        self.check_owner(owner, unit_id)?;
        self.owners.remove(&unit_id);
        self.approvals.remove(&unit_id);
        self.uris.remove(&unit_id);
        self.cleared.remove(&unit_id);
        Ok(())
    }

    /// Approve `spender` for one unit. `caller` must be the owner or one of
    /// its operators.
    ///
    /// # Errors
    /// `UnknownUnit` or `NotOwner`.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        unit_id: U256,
    ) -> Result<(), TransferError> {
        let owner = self.owner_of(unit_id).ok_or(TransferError::UnknownUnit(unit_id))?;
        if caller != owner && !self.is_approved_for_all(owner, caller) {
            return Err(TransferError::NotOwner {
                unit_id,
                owner: caller,
            });
        }
        if spender.is_zero() {
            self.approvals.remove(&unit_id);
        } else {
            self.approvals.insert(unit_id, spender);
        }
        Ok(())
    }

    /// Grant or revoke `operator` over every unit `owner` holds.
    pub fn set_approval_for_all(&mut self, owner: Address, operator: Address, approved: bool) {
        if approved {
            self.operators.insert((owner, operator));
        } else {
            self.operators.remove(&(owner, operator));
        }
    }

    #[must_use]
    pub fn owner_of(&self, unit_id: U256) -> Option<Address> {
        self.owners.get(&unit_id).copied()
    }

    #[must_use]
    pub fn get_approved(&self, unit_id: U256) -> Option<Address> {
        self.approvals.get(&unit_id).copied()
    }

    #[must_use]
    pub fn is_approved_for_all(&self, owner: Address, operator: Address) -> bool {
        self.operators.contains(&(owner, operator))
    }

    #[must_use]
    pub fn token_uri(&self, unit_id: U256) -> Option<&str> {
        self.uris.get(&unit_id).map(String::as_str)
    }

    /// Number of units held by `owner`.
    #[must_use]
    pub fn balance_of(&self, owner: Address) -> usize {
        self.owners.values().filter(|o| **o == owner).count()
    }

    /// Total units in existence.
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.owners.len()
    }

    fn check_owner(&self, owner: Address, unit_id: U256) -> Result<(), TransferError> {
        match self.owner_of(unit_id) {
            None => Err(TransferError::UnknownUnit(unit_id)),
            Some(actual) if actual != owner => Err(TransferError::NotOwner { unit_id, owner }),
            Some(_) => Ok(()),
        }
    }

    fn is_authorized(&self, spender: Address, owner: Address, unit_id: U256) -> bool {
        spender == owner
            || self.is_approved_for_all(owner, spender)
            || self.get_approved(unit_id) == Some(spender)
    }
}

impl ItemAsset for ItemLedger {
    fn check_transfer_from(
        &self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> Result<(), TransferError> {
        check_recipient(recipient)?;
        self.check_owner(owner, unit_id)?;
        if !self.is_authorized(spender, owner, unit_id) {
            return Err(TransferError::NotApproved { unit_id, spender });
        }
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> Result<(), TransferError> {
        self.check_transfer_from(spender, owner, recipient, unit_id)?;

        match self.approvals.remove(&unit_id) {
            Some(previous) => self.cleared.insert(unit_id, previous),
            None => self.cleared.remove(&unit_id),
        };
        self.owners.insert(unit_id, recipient);
        Ok(())
    }

    fn revert_transfer(
        &mut self,
        _spender: Address,
        owner: Address,
        recipient: Address,
        unit_id: U256,
    ) -> Result<(), TransferError> {
        self.check_owner(recipient, unit_id)?;

        self.owners.insert(unit_id, owner);
        match self.cleared.remove(&unit_id) {
            Some(previous) => self.approvals.insert(unit_id, previous),
            None => self.approvals.remove(&unit_id),
        };
        tracing::debug!(
            token = %self.name,
            %owner,
            %recipient,
            %unit_id,
            "Item transfer reverted"
        );
        Ok(())
    }
}
