//! Canonical order hashing.
//!
//! The digest is what makers sign and what the settlement ledger keys on,
//! so the encoding must be reproducible byte-for-byte by off-chain tooling:
//!
//! ```text
//! keccak256(
//!     domain[20] || maker[20] || makerToken[20] || makerReceiver[20] ||
//!     taker[20]  || takerToken[20] ||
//!     len(makerValues)[32] || makerValues[32]... ||
//!     len(takerValues)[32] || takerValues[32]... ||
//!     expiration[32] || nonce[32]
//! )
//! ```
//!
//! Integers are big-endian 32-byte words. An open taker is the zero address.
//! Both value sequences are length-prefixed, so shifting a value from one
//! side to the other yields a different digest.

use alloy_primitives::{Address, Keccak256, U256};
use itemswap_types::{Order, OrderHash};

/// Computes order hashes for one settlement domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderHasher {
    domain: Address,
}

impl OrderHasher {
    /// `domain` is the settlement engine's own address.
    #[must_use]
    pub fn new(domain: Address) -> Self {
        Self { domain }
    }

    #[must_use]
    pub fn domain(&self) -> Address {
        self.domain
    }

    /// Digest of `order` in this domain.
    #[must_use]
    pub fn hash(&self, order: &Order) -> OrderHash {
        let mut hasher = Keccak256::new();
        hasher.update(self.domain);
        for identity in order.addresses() {
            hasher.update(identity);
        }
        update_values(&mut hasher, &order.maker_values);
        update_values(&mut hasher, &order.taker_values);
        hasher.update(word(U256::from(order.expiration)));
        hasher.update(word(order.nonce));
        OrderHash(hasher.finalize())
    }

    /// The exact bytes fed to keccak256, for tooling that signs elsewhere.
    #[must_use]
    pub fn preimage(&self, order: &Order) -> Vec<u8> {
        let words = 4 + order.maker_values.len() + order.taker_values.len();
        let mut out = Vec::with_capacity(6 * 20 + words * 32);
        out.extend_from_slice(self.domain.as_slice());
        for identity in order.addresses() {
            out.extend_from_slice(identity.as_slice());
        }
        for values in [&order.maker_values, &order.taker_values] {
            out.extend_from_slice(&word(U256::from(values.len())));
            for value in values {
                out.extend_from_slice(&word(*value));
            }
        }
        out.extend_from_slice(&word(U256::from(order.expiration)));
        out.extend_from_slice(&word(order.nonce));
        out
    }
}

impl Default for OrderHasher {
    fn default() -> Self {
        Self::new(itemswap_types::constants::DEFAULT_EXCHANGE)
    }
}

/// Hash `order` in `domain` without keeping a hasher around.
#[must_use]
pub fn hash_order(domain: Address, order: &Order) -> OrderHash {
    OrderHasher::new(domain).hash(order)
}

fn update_values(hasher: &mut Keccak256, values: &[U256]) {
    hasher.update(word(U256::from(values.len())));
    for value in values {
        hasher.update(word(*value));
    }
}

fn word(value: U256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}
