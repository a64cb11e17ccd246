//! secp256k1 signer recovery for order signatures.
//!
//! Stateless. The only failure mode is a malformed signature; whether the
//! recovered signer is the maker is the validator's call.

use alloy_primitives::{Address, B256, Keccak256, Signature, U256};
use itemswap_types::{
    constants::{ETH_SIGN_PREFIX, SECP256K1_HALF_N, SECP256K1_N},
    OrderHash, SignatureTriple, SigningScheme, SwapCode,
};

/// The 32-byte message actually signed for `hash` under `scheme`.
#[must_use]
pub fn signing_message(scheme: SigningScheme, hash: &OrderHash) -> B256 {
    match scheme {
        SigningScheme::Prehashed => hash.0,
        SigningScheme::EthSign => {
            let mut hasher = Keccak256::new();
            hasher.update(ETH_SIGN_PREFIX);
            hasher.update(hash.0);
            hasher.finalize()
        }
    }
}

/// Recovers signer identities under one signing scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignatureVerifier {
    scheme: SigningScheme,
}

impl SignatureVerifier {
    #[must_use]
    pub fn new(scheme: SigningScheme) -> Self {
        Self { scheme }
    }

    #[must_use]
    pub fn scheme(&self) -> SigningScheme {
        self.scheme
    }

    /// Recover the address that signed `hash`.
    ///
    /// # Errors
    /// [`SwapCode::InvalidSign`] if `v` is not a valid recovery id, `r` or
    /// `s` is outside `[1, n-1]`, `s` is in the upper half of the curve
    /// order, or the point cannot be recovered.
    pub fn recover(
        &self,
        hash: &OrderHash,
        signature: &SignatureTriple,
    ) -> Result<Address, SwapCode> {
        let parity = signature.parity().ok_or(SwapCode::InvalidSign)?;

        let r = U256::from_be_bytes(signature.r.0);
        let s = U256::from_be_bytes(signature.s.0);
        if r.is_zero() || r >= SECP256K1_N {
            return Err(SwapCode::InvalidSign);
        }
        if s.is_zero() || s > SECP256K1_HALF_N {
            return Err(SwapCode::InvalidSign);
        }

        let message = signing_message(self.scheme, hash);
        Signature::new(r, s, parity)
            .recover_address_from_prehash(&message)
            .map_err(|err| {
                tracing::debug!(
                    order = %hash.short(),
                    error = %err,
                    "Signature recovery failed"
                );
                SwapCode::InvalidSign
            })
    }
}
