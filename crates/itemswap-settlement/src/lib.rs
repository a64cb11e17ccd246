//! # itemswap-settlement
//!
//! **Settlement plane**: fill ledger, durable journal, and the atomic swap
//! executor.
//!
//! ## Architecture
//!
//! The executor receives a signed order from a caller and:
//! 1. Validates it (hash, signature, expiry, caller, fill state)
//! 2. Preflights every transfer leg against the collaborators
//! 3. Executes the legs, compensating in reverse on failure
//! 4. Commits the order hash to the [`FillLedger`] last
//! 5. Returns a [`Settlement`] record for the audit trail
//!
//! ## Ledgers
//!
//! - [`InMemoryFillLedger`]: process-local
//! - [`JournalFillLedger`]: append-only JSON lines, `fsync` per entry
//! - [`ConfiguredLedger`]: whichever [`LedgerConfig`] selects
//!
//! [`LedgerConfig`]: itemswap_types::LedgerConfig

pub mod clock;
pub mod executor;
pub mod journal;
pub mod ledger;
pub mod serialized;

mod legs;

pub use clock::{Clock, FixedClock, SystemClock};
pub use executor::{Settlement, SwapExecutor, SwapOutcome};
pub use journal::JournalFillLedger;
pub use ledger::{
    ConfiguredLedger, ConsumeKind, FillLedger, InMemoryFillLedger, LedgerEntry,
    compute_ledger_digest, digest_hex,
};
pub use serialized::SerializedExecutor;
