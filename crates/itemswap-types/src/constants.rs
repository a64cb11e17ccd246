//! System-wide constants for the ItemSwap settlement engine.

use alloy_primitives::{Address, U256};

/// Order of the secp256k1 group, `n`.
pub const SECP256K1_N: U256 = U256::from_limbs([
    0xBFD2_5E8C_D036_4141,
    0xBAAE_DCE6_AF48_A03B,
    0xFFFF_FFFF_FFFF_FFFE,
    0xFFFF_FFFF_FFFF_FFFF,
]);

/// `n / 2`. Signatures with `s` above this bound are the malleable twin
/// of a low-`s` signature and are rejected.
pub const SECP256K1_HALF_N: U256 = U256::from_limbs([
    0xDFE9_2F46_681B_20A0,
    0x5D57_6E73_57A4_501D,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
]);

/// Prefix wallets prepend when signing a 32-byte message via `eth_sign`.
pub const ETH_SIGN_PREFIX: &[u8; 28] = b"\x19Ethereum Signed Message:\n32";

/// Legacy recovery id offset (`v = 27 + parity`).
pub const LEGACY_V_OFFSET: u8 = 27;

/// Domain address used when no exchange address is configured.
pub const DEFAULT_EXCHANGE: Address = Address::ZERO;

/// Width in bytes of one encoded word in the order hash preimage.
pub const WORD_SIZE: usize = 32;

/// Upper bound on values per order side. Bounds the transfers and the
/// rollback journal of one fill. The order is still hashed in full before
/// the shape check, since validation always reports the hash.
pub const MAX_VALUES_PER_SIDE: usize = 256;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "ItemSwap";
