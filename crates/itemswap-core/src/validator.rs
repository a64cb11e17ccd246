//! Order validation: the single gate in front of every settlement.
//!
//! Pure decision function. It reads the fill ledger through [`FillStatus`]
//! and never writes. Checks run in a fixed precedence so that the returned
//! [`SwapCode`] is deterministic:
//!
//! | # | Check | Code on failure |
//! |---|-------|-----------------|
//! | 1 | both tokens recognized, different classes | `ERROR_INVALID_ADDRESS` |
//! | 2 | value shapes match token classes | `ERROR_INVALID_VALUES` |
//! | 3 | hash the order | - |
//! | 4 | recovered signer is the maker | `ERROR_INVALID_SIGN` |
//! | 5 | now < expiration (fill only) | `ERROR_EXPIRED` |
//! | 6 | caller is the taker (fill) / the maker (cancel) | `ERROR_INVALID_TAKER` / `ERROR_INVALID_MAKER` |
//! | 7 | hash not yet consumed | `ERROR_INVALID_FILL` |
//!
//! Tampering with any field after signing changes the hash computed in
//! step 3, so a forged amount surfaces as `ERROR_INVALID_SIGN` in step 4.
//! The hash itself is computed before step 1 so that it accompanies every
//! code, including oversized orders rejected in step 2.

use std::collections::HashSet;

use alloy_primitives::{Address, U256};
use itemswap_types::{
    constants::MAX_VALUES_PER_SIDE, AssetClass, AssetDirectory, Order, OrderHash,
    SignatureTriple, SigningScheme, SwapCode, SwapConfig,
};

use crate::{OrderHasher, SignatureVerifier};

/// Read access to the settlement ledger.
pub trait FillStatus {
    /// Has `hash` been filled or cancelled?
    fn is_consumed(&self, hash: &OrderHash) -> bool;
}

impl<S: std::hash::BuildHasher> FillStatus for HashSet<OrderHash, S> {
    fn is_consumed(&self, hash: &OrderHash) -> bool {
        self.contains(hash)
    }
}

/// Which entry point is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationMode {
    /// Caller must be the taker; the order must be unexpired.
    Fill,
    /// Caller must be the maker; expiration is ignored.
    Cancel,
}

/// Who is calling, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    /// Unix seconds.
    pub now: i64,
}

impl CallContext {
    #[must_use]
    pub fn new(caller: Address, now: i64) -> Self {
        Self { caller, now }
    }
}

/// Outcome of a validation: the code plus the order's digest.
///
/// The digest is always populated, even when the code was decided before
/// hashing, so callers can correlate rejections with order identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub code: SwapCode,
    pub hash: OrderHash,
}

impl Validation {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code.is_ok()
    }

    /// `(code, hash)` as returned to off-chain tooling.
    #[must_use]
    pub fn into_parts(self) -> (SwapCode, OrderHash) {
        (self.code, self.hash)
    }
}

/// Order validator bound to one settlement domain and signing scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderValidator {
    hasher: OrderHasher,
    verifier: SignatureVerifier,
}

impl OrderValidator {
    #[must_use]
    pub fn new(domain: Address, scheme: SigningScheme) -> Self {
        Self {
            hasher: OrderHasher::new(domain),
            verifier: SignatureVerifier::new(scheme),
        }
    }

    #[must_use]
    pub fn from_config(config: &SwapConfig) -> Self {
        Self::new(config.exchange, config.signing_scheme)
    }

    #[must_use]
    pub fn hasher(&self) -> &OrderHasher {
        &self.hasher
    }

    #[must_use]
    pub fn verifier(&self) -> &SignatureVerifier {
        &self.verifier
    }

    /// Digest of `order` in this validator's domain.
    #[must_use]
    pub fn hash(&self, order: &Order) -> OrderHash {
        self.hasher.hash(order)
    }

    /// Validate `order` for a fill by `ctx.caller`.
    pub fn validate_fill<A, F>(
        &self,
        assets: &A,
        fills: &F,
        order: &Order,
        signature: &SignatureTriple,
        ctx: CallContext,
    ) -> Validation
    where
        A: AssetDirectory + ?Sized,
        F: FillStatus + ?Sized,
    {
        self.validate(assets, fills, order, signature, ctx, ValidationMode::Fill)
    }

    /// Validate `order` for a cancel by `ctx.caller`.
    pub fn validate_cancel<A, F>(
        &self,
        assets: &A,
        fills: &F,
        order: &Order,
        signature: &SignatureTriple,
        ctx: CallContext,
    ) -> Validation
    where
        A: AssetDirectory + ?Sized,
        F: FillStatus + ?Sized,
    {
        self.validate(assets, fills, order, signature, ctx, ValidationMode::Cancel)
    }

    /// Run every check in precedence order for the given mode.
    pub fn validate<A, F>(
        &self,
        assets: &A,
        fills: &F,
        order: &Order,
        signature: &SignatureTriple,
        ctx: CallContext,
        mode: ValidationMode,
    ) -> Validation
    where
        A: AssetDirectory + ?Sized,
        F: FillStatus + ?Sized,
    {
        let hash = self.hasher.hash(order);
        let code = self.decide(assets, fills, order, signature, &hash, ctx, mode);

        if !code.is_ok() {
            tracing::debug!(
                order = %hash.short(),
                caller = %ctx.caller,
                ?mode,
                %code,
                "Order rejected"
            );
        }

        Validation { code, hash }
    }

    #[allow(clippy::too_many_arguments)]
    fn decide<A, F>(
        &self,
        assets: &A,
        fills: &F,
        order: &Order,
        signature: &SignatureTriple,
        hash: &OrderHash,
        ctx: CallContext,
        mode: ValidationMode,
    ) -> SwapCode
    where
        A: AssetDirectory + ?Sized,
        F: FillStatus + ?Sized,
    {
        // 1. Address legality
        let Some((maker_class, taker_class)) = token_classes(assets, order) else {
            return SwapCode::InvalidAddress;
        };

        // 2. Value-shape legality
        if !values_well_formed(maker_class, &order.maker_values)
            || !values_well_formed(taker_class, &order.taker_values)
        {
            return SwapCode::InvalidValues;
        }

        // 3 + 4. Signature over the submitted fields
        match self.verifier.recover(hash, signature) {
            Ok(signer) if signer == order.maker => {}
            Ok(_) | Err(_) => return SwapCode::InvalidSign,
        }

        match mode {
            ValidationMode::Fill => {
                // 5. Expiration
                if order.is_expired_at(ctx.now) {
                    return SwapCode::Expired;
                }
                // 6. Taker authorization
                if !order.taker.permits(&ctx.caller) {
                    return SwapCode::InvalidTaker;
                }
            }
            ValidationMode::Cancel => {
                if ctx.caller != order.maker {
                    return SwapCode::InvalidMaker;
                }
            }
        }

        // 7. Fill state
        if fills.is_consumed(hash) {
            return SwapCode::InvalidFill;
        }

        SwapCode::Ok
    }
}

/// Classes of `(makerToken, takerToken)` if both are recognized and differ.
fn token_classes<A>(assets: &A, order: &Order) -> Option<(AssetClass, AssetClass)>
where
    A: AssetDirectory + ?Sized,
{
    let maker = assets.class_of(&order.maker_token)?;
    let taker = assets.class_of(&order.taker_token)?;
    (maker != taker).then_some((maker, taker))
}

/// Fungible: exactly one non-zero quantity. Item: one or more distinct ids.
#[must_use]
pub fn values_well_formed(class: AssetClass, values: &[U256]) -> bool {
    if values.len() > MAX_VALUES_PER_SIDE {
        return false;
    }
    match class {
        AssetClass::Fungible => matches!(values, [quantity] if !quantity.is_zero()),
        AssetClass::Item => {
            let mut seen = HashSet::with_capacity(values.len());
            !values.is_empty() && values.iter().all(|id| seen.insert(*id))
        }
    }
}
