//! Address -> collaborator lookup.
//!
//! Each collaborator is registered once under its address and carries its
//! class in the variant, so the executor never asks a token what it is.

use std::collections::HashMap;

use alloy_primitives::Address;
use itemswap_types::{
    AssetClass, AssetDirectory, FungibleAsset, ItemAsset, Result, SwapConfig, SwapError,
    TransferError,
};

/// A registered collaborator, tagged with its class.
pub enum Collaborator {
    Fungible(Box<dyn FungibleAsset>),
    Item(Box<dyn ItemAsset>),
}

impl Collaborator {
    #[must_use]
    pub fn class(&self) -> AssetClass {
        match self {
            Self::Fungible(_) => AssetClass::Fungible,
            Self::Item(_) => AssetClass::Item,
        }
    }
}

impl std::fmt::Debug for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Collaborator").field(&self.class()).finish()
    }
}

/// Registry of every collaborator the executor may call.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    entries: HashMap<Address, Collaborator>,
}

impl AssetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fungible collaborator at `address`.
    ///
    /// # Errors
    /// `Configuration` if the address is zero or already registered.
    pub fn register_fungible(
        &mut self,
        address: Address,
        asset: impl FungibleAsset + 'static,
    ) -> Result<()> {
        self.insert(address, Collaborator::Fungible(Box::new(asset)))
    }

    /// Register an item collaborator at `address`.
    ///
    /// # Errors
    /// `Configuration` if the address is zero or already registered.
    pub fn register_item(
        &mut self,
        address: Address,
        asset: impl ItemAsset + 'static,
    ) -> Result<()> {
        self.insert(address, Collaborator::Item(Box::new(asset)))
    }

    fn insert(&mut self, address: Address, collaborator: Collaborator) -> Result<()> {
        if address.is_zero() {
            return Err(SwapError::Configuration(
                "collaborator address must not be zero".to_string(),
            ));
        }
        if self.entries.contains_key(&address) {
            return Err(SwapError::Configuration(format!(
                "collaborator {address} already registered"
            )));
        }
        tracing::debug!(%address, class = %collaborator.class(), "Collaborator registered");
        self.entries.insert(address, collaborator);
        Ok(())
    }

    /// Check that the registry holds exactly the assets in `config`, each
    /// with its configured class.
    ///
    /// # Errors
    /// `Configuration` naming the first missing, mismatched or unconfigured
    /// asset.
    pub fn check_against(&self, config: &SwapConfig) -> Result<()> {
        for entry in &config.assets {
            match self.class_of(&entry.address) {
                Some(class) if class == entry.class => {}
                Some(class) => {
                    return Err(SwapError::Configuration(format!(
                        "asset {} configured as {} but registered as {class}",
                        entry.address, entry.class
                    )));
                }
                None => {
                    return Err(SwapError::Configuration(format!(
                        "asset {} configured but not registered",
                        entry.address
                    )));
                }
            }
        }
        if let Some(extra) = self
            .addresses()
            .into_iter()
            .find(|address| config.class_of(address).is_none())
        {
            return Err(SwapError::Configuration(format!(
                "collaborator {extra} registered but not configured"
            )));
        }
        Ok(())
    }

    /// The fungible collaborator at `address`, read-only.
    ///
    /// # Errors
    /// `UnknownCollaborator` if nothing fungible is registered there.
    pub fn fungible(&self, address: &Address) -> std::result::Result<&dyn FungibleAsset, TransferError> {
        match self.entries.get(address) {
            Some(Collaborator::Fungible(asset)) => Ok(asset.as_ref()),
            _ => Err(TransferError::UnknownCollaborator(*address)),
        }
    }

    /// The fungible collaborator at `address`.
    ///
    /// # Errors
    /// `UnknownCollaborator` if nothing fungible is registered there.
    pub fn fungible_mut(
        &mut self,
        address: &Address,
    ) -> std::result::Result<&mut dyn FungibleAsset, TransferError> {
        match self.entries.get_mut(address) {
            Some(Collaborator::Fungible(asset)) => Ok(asset.as_mut()),
            _ => Err(TransferError::UnknownCollaborator(*address)),
        }
    }

    /// The item collaborator at `address`, read-only.
    ///
    /// # Errors
    /// `UnknownCollaborator` if nothing item-class is registered there.
    pub fn item(&self, address: &Address) -> std::result::Result<&dyn ItemAsset, TransferError> {
        match self.entries.get(address) {
            Some(Collaborator::Item(asset)) => Ok(asset.as_ref()),
            _ => Err(TransferError::UnknownCollaborator(*address)),
        }
    }

    /// The item collaborator at `address`.
    ///
    /// # Errors
    /// `UnknownCollaborator` if nothing item-class is registered there.
    pub fn item_mut(
        &mut self,
        address: &Address,
    ) -> std::result::Result<&mut dyn ItemAsset, TransferError> {
        match self.entries.get_mut(address) {
            Some(Collaborator::Item(asset)) => Ok(asset.as_mut()),
            _ => Err(TransferError::UnknownCollaborator(*address)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered addresses, sorted.
    #[must_use]
    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.entries.keys().copied().collect();
        addresses.sort_unstable();
        addresses
    }
}

impl AssetDirectory for AssetRegistry {
    fn class_of(&self, token: &Address) -> Option<AssetClass> {
        self.entries.get(token).map(Collaborator::class)
    }
}
