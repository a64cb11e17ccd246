//! Settlement ledger: the consumed flag per order hash.
//!
//! Like a spent-output set: each order hash can be consumed once, by either
//! a fill or a cancel, and never un-consumed. This is the only replay
//! protection the engine has, so entries are never evicted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use itemswap_core::FillStatus;
use itemswap_types::{LedgerConfig, OrderHash, Result, SwapError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::journal::JournalFillLedger;

/// How an order hash was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumeKind {
    Fill,
    Cancel,
}

impl std::fmt::Display for ConsumeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fill => write!(f, "fill"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

/// One consumed order hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub hash: OrderHash,
    pub kind: ConsumeKind,
    pub consumed_at: DateTime<Utc>,
}

impl LedgerEntry {
    #[must_use]
    pub fn new(hash: OrderHash, kind: ConsumeKind, consumed_at: DateTime<Utc>) -> Self {
        Self {
            hash,
            kind,
            consumed_at,
        }
    }
}

/// Injectable storage for consumed flags.
///
/// Implementations must make `consume` durable before returning `Ok`: the
/// executor treats a successful `consume` as the commit point of a fill.
pub trait FillLedger: FillStatus + Send {
    /// Record `entry.hash` as consumed.
    ///
    /// # Errors
    /// [`SwapError::Ledger`] if the hash is already consumed or the entry
    /// cannot be persisted. The ledger is unchanged on error.
    fn consume(&mut self, entry: LedgerEntry) -> Result<()>;

    /// The entry for `hash`, if consumed.
    fn entry(&self, hash: &OrderHash) -> Option<LedgerEntry>;

    /// Number of consumed hashes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every consumed hash, sorted ascending.
    fn consumed_hashes(&self) -> Vec<OrderHash>;

    /// SHA-256 commitment over the consumed set.
    fn digest(&self) -> [u8; 32] {
        compute_ledger_digest(&self.consumed_hashes())
    }
}

/// Commitment over a sorted set of consumed hashes.
///
/// Two replicas that applied the same fills and cancels, in any order,
/// produce the same digest.
#[must_use]
pub fn compute_ledger_digest(sorted: &[OrderHash]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"itemswap:ledger:v1:");
    hasher.update((sorted.len() as u64).to_le_bytes());
    for hash in sorted {
        hasher.update(hash.as_bytes());
    }

    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

/// `0x`-prefixed hex of a ledger digest, for logs.
#[must_use]
pub fn digest_hex(digest: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(digest))
}

/// Process-local ledger. Lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFillLedger {
    entries: HashMap<OrderHash, LedgerEntry>,
}

impl InMemoryFillLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FillStatus for InMemoryFillLedger {
    fn is_consumed(&self, hash: &OrderHash) -> bool {
        self.entries.contains_key(hash)
    }
}

impl FillLedger for InMemoryFillLedger {
    fn consume(&mut self, entry: LedgerEntry) -> Result<()> {
        if self.entries.contains_key(&entry.hash) {
            return Err(SwapError::Ledger(format!(
                "order {} already consumed",
                entry.hash
            )));
        }
        self.entries.insert(entry.hash, entry);
        Ok(())
    }

    fn entry(&self, hash: &OrderHash) -> Option<LedgerEntry> {
        self.entries.get(hash).copied()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn consumed_hashes(&self) -> Vec<OrderHash> {
        let mut hashes: Vec<OrderHash> = self.entries.keys().copied().collect();
        hashes.sort_unstable();
        hashes
    }
}

/// Ledger selected by [`LedgerConfig`]: a journal when a path is
/// configured, memory otherwise.
#[derive(Debug)]
pub enum ConfiguredLedger {
    Memory(InMemoryFillLedger),
    Journal(JournalFillLedger),
}

impl ConfiguredLedger {
    /// Open the ledger described by `config`.
    ///
    /// # Errors
    /// Whatever [`JournalFillLedger::open`] returns.
    pub fn from_config(config: &LedgerConfig) -> Result<Self> {
        match &config.journal_path {
            Some(path) => JournalFillLedger::open(path).map(Self::Journal),
            None => Ok(Self::Memory(InMemoryFillLedger::new())),
        }
    }

    fn inner(&self) -> &dyn FillLedger {
        match self {
            Self::Memory(ledger) => ledger,
            Self::Journal(ledger) => ledger,
        }
    }
}

impl FillStatus for ConfiguredLedger {
    fn is_consumed(&self, hash: &OrderHash) -> bool {
        self.inner().is_consumed(hash)
    }
}

impl FillLedger for ConfiguredLedger {
    fn consume(&mut self, entry: LedgerEntry) -> Result<()> {
        match self {
            Self::Memory(ledger) => ledger.consume(entry),
            Self::Journal(ledger) => ledger.consume(entry),
        }
    }

    fn entry(&self, hash: &OrderHash) -> Option<LedgerEntry> {
        self.inner().entry(hash)
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn consumed_hashes(&self) -> Vec<OrderHash> {
        self.inner().consumed_hashes()
    }
}
