//! Signature representation for maker-signed orders.
//!
//! Orders are signed with secp256k1 ECDSA. The engine receives the
//! signature as the classic `(v, r, s)` triple; recovery lives in
//! `itemswap-core`.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

use crate::constants::LEGACY_V_OFFSET;

/// How the maker produced the signature over the order hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningScheme {
    /// `eth_sign` / `personal_sign`: the signed message is
    /// `keccak256("\x19Ethereum Signed Message:\n32" || order_hash)`.
    #[default]
    EthSign,
    /// The raw order hash was signed directly.
    Prehashed,
}

/// ECDSA signature as submitted alongside an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SignatureTriple {
    /// Recovery id: `27`/`28`, or the raw parity `0`/`1`.
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl SignatureTriple {
    #[must_use]
    pub fn new(v: u8, r: B256, s: B256) -> Self {
        Self { v, r, s }
    }

    /// Parse the 65-byte `r || s || v` encoding used by wallets.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; 65]) -> Self {
        Self {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: bytes[64],
        }
    }

    /// r + s + v
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = self.v;
        bytes
    }

    /// The y-parity encoded by `v`, or `None` for an invalid recovery id.
    #[must_use]
    pub fn parity(&self) -> Option<bool> {
        match self.v {
            0 | 1 => Some(self.v == 1),
            v if v == LEGACY_V_OFFSET || v == LEGACY_V_OFFSET + 1 => {
                Some(v == LEGACY_V_OFFSET + 1)
            }
            _ => None,
        }
    }
}

impl From<alloy_primitives::Signature> for SignatureTriple {
    fn from(sig: alloy_primitives::Signature) -> Self {
        Self {
            v: LEGACY_V_OFFSET + u8::from(sig.v()),
            r: B256::new(sig.r().to_be_bytes::<32>()),
            s: B256::new(sig.s().to_be_bytes::<32>()),
        }
    }
}
