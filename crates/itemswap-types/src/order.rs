//! Order types for the ItemSwap settlement engine.
//!
//! An [`Order`] is built and signed by a maker off-chain. The engine never
//! stores orders; only their [`OrderHash`](crate::OrderHash) is recorded once
//! the order is filled or cancelled.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// The two recognized asset classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    /// Balance token: values are a single quantity.
    Fungible,
    /// Per-unit token: values are one or more distinct unit ids.
    Item,
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fungible => write!(f, "FUNGIBLE"),
            Self::Item => write!(f, "ITEM"),
        }
    }
}

/// Who may fill an order.
///
/// Encoded as an address on the wire and in the order hash: [`Taker::Open`]
/// is the zero address. Open orders are accepted from any caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Address", into = "Address")]
pub enum Taker {
    /// Any caller may fill.
    Open,
    /// Only this identity may fill.
    Restricted(Address),
}

impl Taker {
    /// Address form used for hashing and serialization.
    #[must_use]
    pub fn as_address(&self) -> Address {
        match self {
            Self::Open => Address::ZERO,
            Self::Restricted(addr) => *addr,
        }
    }

    /// Does this taker authorize `caller`?
    #[must_use]
    pub fn permits(&self, caller: &Address) -> bool {
        match self {
            Self::Open => true,
            Self::Restricted(addr) => addr == caller,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl From<Address> for Taker {
    fn from(addr: Address) -> Self {
        if addr.is_zero() {
            Self::Open
        } else {
            Self::Restricted(addr)
        }
    }
}

impl From<Taker> for Address {
    fn from(taker: Taker) -> Self {
        taker.as_address()
    }
}

/// A maker-signed swap order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Signer and owner of the offered assets.
    pub maker: Address,
    /// Token contract the maker offers.
    pub maker_token: Address,
    /// Receives the taker's payment on fill.
    pub maker_receiver: Address,
    /// Quantity (fungible) or unit ids (item) the maker offers.
    pub maker_values: Vec<U256>,
    pub taker: Taker,
    /// Token contract the taker must supply.
    pub taker_token: Address,
    /// Quantity (fungible) or unit ids (item) the taker supplies.
    pub taker_values: Vec<U256>,
    /// Unix timestamp (seconds); the order is void from this instant on.
    pub expiration: u64,
    pub nonce: U256,
}

impl Order {
    /// Rebuild an order from the positional layout used by existing tooling:
    /// `[maker, makerToken, makerReceiver, taker, takerToken]`.
    #[must_use]
    pub fn from_parts(
        addresses: [Address; 5],
        maker_values: Vec<U256>,
        taker_values: Vec<U256>,
        expiration: u64,
        nonce: U256,
    ) -> Self {
        let [maker, maker_token, maker_receiver, taker, taker_token] = addresses;
        Self {
            maker,
            maker_token,
            maker_receiver,
            maker_values,
            taker: Taker::from(taker),
            taker_token,
            taker_values,
            expiration,
            nonce,
        }
    }

    /// The five identities in positional layout.
    #[must_use]
    pub fn addresses(&self) -> [Address; 5] {
        [
            self.maker,
            self.maker_token,
            self.maker_receiver,
            self.taker.as_address(),
            self.taker_token,
        ]
    }

    /// Has the order expired at unix time `now`?
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        // Negative clocks are treated as epoch zero.
        let now = u64::try_from(now).unwrap_or(0);
        now >= self.expiration
    }
}

/// Fixture orders for unit tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// An order offering unit `1` of `maker_token` for `100` of
    /// `taker_token`, restricted to `taker` (open if zero), with a random
    /// nonce.
    pub fn dummy(maker: Address, maker_token: Address, taker: Address, taker_token: Address) -> Self {
        Self {
            maker,
            maker_token,
            maker_receiver: maker,
            maker_values: vec![U256::from(1)],
            taker: Taker::from(taker),
            taker_token,
            taker_values: vec![U256::from(100)],
            expiration: u64::MAX,
            nonce: U256::from(rand::random::<u64>()),
        }
    }
}
