//! Protocol codes and error types for the ItemSwap settlement engine.
//!
//! Two layers:
//! - [`SwapCode`]: the stable, integer-valued outcome of `validate` / `fill` /
//!   `cancel`. These values are shared with off-chain tooling and must never
//!   be renumbered.
//! - [`SwapError`]: infrastructure failures (collaborator transfers, ledger
//!   persistence, configuration). All messages use the `SWAP_ERR_` prefix for
//!   easy grepping in logs. Grouped by subsystem:
//!   - 1xx: Asset transfer errors
//!   - 2xx: Settlement ledger errors
//!   - 9xx: General / internal errors

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome code of a validation, fill, or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum SwapCode {
    /// The order passed every check (or the operation committed).
    Ok = 1,
    /// Unknown token address, or both tokens of the same class.
    InvalidAddress = 1001,
    /// Value sequence has the wrong shape for its token class.
    InvalidValues = 1002,
    /// Malformed signature, or signer is not the maker.
    InvalidSign = 1003,
    /// The order's expiration has passed.
    Expired = 1004,
    /// Caller is not the order's taker.
    InvalidTaker = 1005,
    /// Caller is not the order's maker (cancel only).
    InvalidMaker = 1006,
    /// The order hash was already filled or cancelled.
    InvalidFill = 1007,
}

impl SwapCode {
    /// Every code, in numeric order.
    pub const ALL: [Self; 8] = [
        Self::Ok,
        Self::InvalidAddress,
        Self::InvalidValues,
        Self::InvalidSign,
        Self::Expired,
        Self::InvalidTaker,
        Self::InvalidMaker,
        Self::InvalidFill,
    ];

    /// The wire value of this code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Look up a code by its wire value.
    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Canonical upper-case name shared with off-chain tooling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::InvalidAddress => "ERROR_INVALID_ADDRESS",
            Self::InvalidValues => "ERROR_INVALID_VALUES",
            Self::InvalidSign => "ERROR_INVALID_SIGN",
            Self::Expired => "ERROR_EXPIRED",
            Self::InvalidTaker => "ERROR_INVALID_TAKER",
            Self::InvalidMaker => "ERROR_INVALID_MAKER",
            Self::InvalidFill => "ERROR_INVALID_FILL",
        }
    }
}

impl fmt::Display for SwapCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl From<SwapCode> for u16 {
    fn from(code: SwapCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for SwapCode {
    type Error = SwapError;

    fn try_from(code: u16) -> Result<Self> {
        Self::from_code(code)
            .ok_or_else(|| SwapError::Serialization(format!("unknown swap code {code}")))
    }
}

/// Failure reported by an asset collaborator for a single transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: U256, available: U256 },

    #[error("insufficient allowance: need {needed}, allowed {allowed}")]
    InsufficientAllowance { needed: U256, allowed: U256 },

    #[error("unit {unit_id} is not owned by {owner}")]
    NotOwner { unit_id: U256, owner: Address },

    #[error("spender {spender} is not approved for unit {unit_id}")]
    NotApproved { unit_id: U256, spender: Address },

    #[error("unit {0} does not exist")]
    UnknownUnit(U256),

    #[error("no collaborator registered at {0}")]
    UnknownCollaborator(Address),

    #[error("balance overflow crediting {0}")]
    Overflow(Address),

    /// Catch-all for external collaborators with their own failure modes.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Central error enum for ItemSwap infrastructure failures.
#[derive(Debug, Error)]
pub enum SwapError {
    // =================================================================
    // Asset Transfer Errors (1xx)
    // =================================================================
    /// A collaborator refused a transfer. Any transfers already performed in
    /// the same call have been rolled back.
    #[error("SWAP_ERR_100: Transfer failed on {token}: {source}")]
    Transfer {
        token: Address,
        #[source]
        source: TransferError,
    },

    /// A compensating transfer failed; collaborator state needs operator
    /// attention.
    #[error("SWAP_ERR_101: Rollback incomplete: {reason}")]
    RollbackFailed { reason: String },

    // =================================================================
    // Settlement Ledger Errors (2xx)
    // =================================================================
    /// The fill ledger could not record or read an entry.
    #[error("SWAP_ERR_200: Ledger failure: {0}")]
    Ledger(String),

    /// The journal on disk is not a valid ledger journal.
    #[error("SWAP_ERR_201: Corrupt journal at line {line}: {reason}")]
    CorruptJournal { line: usize, reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SWAP_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SWAP_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("SWAP_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk).
    #[error("SWAP_ERR_903: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SwapError>;

impl From<std::io::Error> for SwapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
