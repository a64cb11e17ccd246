//! Identifiers used throughout ItemSwap.
//!
//! Identities (makers, takers, token contracts) are plain 20-byte
//! [`Address`]es. Orders are identified by their canonical digest,
//! [`OrderHash`], which is also the settlement ledger's primary key.

use std::fmt;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// 256-bit canonical identity of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHash(pub B256);

impl OrderHash {
    pub const ZERO: Self = Self(B256::ZERO);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0.0
    }

    /// First four bytes as hex, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::str::FromStr for OrderHash {
    type Err = crate::SwapError;

    fn from_str(s: &str) -> crate::Result<Self> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw)
            .map_err(|e| crate::SwapError::Serialization(format!("order hash {s:?}: {e}")))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            crate::SwapError::Serialization(format!("order hash {s:?}: expected 32 bytes"))
        })?;
        Ok(Self::from_bytes(bytes))
    }
}

impl From<B256> for OrderHash {
    fn from(value: B256) -> Self {
        Self(value)
    }
}
