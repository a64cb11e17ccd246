//! Deterministic signing keys for tests. **Never use in production.**

use alloy_primitives::{Address, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use itemswap_types::{Order, OrderHash, SignatureTriple, SigningScheme};

use crate::OrderHasher;

/// A local secp256k1 key derived from a seed byte.
#[derive(Debug, Clone)]
pub struct TestKey {
    signer: PrivateKeySigner,
}

impl TestKey {
    /// Key whose secret is `seed` repeated 32 times. `seed` must be in
    /// `1..=0xfe` for the secret to be a valid scalar.
    pub fn new(seed: u8) -> Self {
        let signer = PrivateKeySigner::from_bytes(&B256::repeat_byte(seed))
            .expect("seed produces a valid secp256k1 scalar");
        Self { signer }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign an order hash the way a wallet would under `scheme`.
    pub fn sign(&self, hash: &OrderHash, scheme: SigningScheme) -> SignatureTriple {
        let signature = match scheme {
            SigningScheme::EthSign => self.signer.sign_message_sync(hash.as_bytes()),
            SigningScheme::Prehashed => self.signer.sign_hash_sync(&hash.0),
        }
        .expect("local signing does not fail");
        SignatureTriple::from(signature)
    }

    /// Hash `order` with `hasher` and sign the digest.
    pub fn sign_order(
        &self,
        hasher: &OrderHasher,
        order: &Order,
        scheme: SigningScheme,
    ) -> SignatureTriple {
        self.sign(&hasher.hash(order), scheme)
    }
}
