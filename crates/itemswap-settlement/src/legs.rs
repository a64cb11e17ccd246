//! Transfer legs of a fill.
//!
//! A fill moves `takerValues` of `takerToken` from the caller to
//! `makerReceiver`, then `makerValues` of `makerToken` from the maker to the
//! caller. Each fungible side is one leg; each item side is one leg per unit
//! id.

use alloy_primitives::{Address, U256};
use itemswap_assets::AssetRegistry;
use itemswap_types::{AssetClass, AssetDirectory, Order, TransferError};

/// One collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Leg {
    pub class: AssetClass,
    pub token: Address,
    pub from: Address,
    pub to: Address,
    /// Quantity for fungible legs, unit id for item legs.
    pub value: U256,
}

impl Leg {
    pub fn check(&self, assets: &AssetRegistry, spender: Address) -> Result<(), TransferError> {
        match self.class {
            AssetClass::Fungible => assets
                .fungible(&self.token)?
                .check_transfer_from(spender, self.from, self.to, self.value),
            AssetClass::Item => assets
                .item(&self.token)?
                .check_transfer_from(spender, self.from, self.to, self.value),
        }
    }

    pub fn execute(
        &self,
        assets: &mut AssetRegistry,
        spender: Address,
    ) -> Result<(), TransferError> {
        match self.class {
            AssetClass::Fungible => assets
                .fungible_mut(&self.token)?
                .transfer_from(spender, self.from, self.to, self.value),
            AssetClass::Item => assets
                .item_mut(&self.token)?
                .transfer_from(spender, self.from, self.to, self.value),
        }
    }

    pub fn revert(&self, assets: &mut AssetRegistry, spender: Address) -> Result<(), TransferError> {
        match self.class {
            AssetClass::Fungible => assets
                .fungible_mut(&self.token)?
                .revert_transfer(spender, self.from, self.to, self.value),
            AssetClass::Item => assets
                .item_mut(&self.token)?
                .revert_transfer(spender, self.from, self.to, self.value),
        }
    }
}

/// Legs for filling `order` by `caller`, taker side first.
///
/// Returns `None` if either token is unknown to `assets`. Callers validate
/// first, so that only happens if the registry changed in between.
pub(crate) fn plan<A>(order: &Order, caller: Address, assets: &A) -> Option<Vec<Leg>>
where
    A: AssetDirectory + ?Sized,
{
    let taker_class = assets.class_of(&order.taker_token)?;
    let maker_class = assets.class_of(&order.maker_token)?;

    let taker_legs = order.taker_values.iter().map(|value| Leg {
        class: taker_class,
        token: order.taker_token,
        from: caller,
        to: order.maker_receiver,
        value: *value,
    });
    let maker_legs = order.maker_values.iter().map(|value| Leg {
        class: maker_class,
        token: order.maker_token,
        from: order.maker,
        to: caller,
        value: *value,
    });
    Some(taker_legs.chain(maker_legs).collect())
}
