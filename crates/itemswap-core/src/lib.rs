//! # itemswap-core
//!
//! **Pure order hashing, signature recovery and validation for ItemSwap.**
//!
//! Core is the decision plane. Given an order, a signature, a caller and a
//! clock reading it answers one question: may this order settle now? It has:
//!
//! - **Zero side effects**: no transfers, no ledger writes
//! - **Deterministic output**: same inputs -> same code and hash everywhere
//! - **Fixed precedence**: the first failing check decides the code
//! - **Domain separation**: the engine address is mixed into every hash

pub mod hasher;
pub mod validator;
pub mod verifier;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use hasher::{OrderHasher, hash_order};
pub use validator::{
    CallContext, FillStatus, OrderValidator, Validation, ValidationMode, values_well_formed,
};
pub use verifier::{SignatureVerifier, signing_message};
