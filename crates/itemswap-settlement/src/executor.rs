//! Atomic swap execution.
//!
//! Fill pipeline:
//! 1. Validate (fill mode). Any non-OK code returns with no movement.
//! 2. Preflight every leg with the collaborators' read-only checks
//! 3. Execute legs in order, journaling each completed transfer
//! 4. On a failed leg, revert the journal in reverse order
//! 5. Commit the ledger last; if that fails, revert every leg
//!
//! The collaborators offer no transaction, so step 4 is the rollback. If a
//! compensating transfer itself fails the executor reports
//! [`SwapError::RollbackFailed`] and the assets need manual repair.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use itemswap_assets::AssetRegistry;
use itemswap_core::{CallContext, OrderValidator, Validation};
use itemswap_types::{
    Order, OrderHash, Result, SignatureTriple, SwapCode, SwapConfig, SwapError,
    constants::{ENGINE_NAME, VERSION},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::legs::{self, Leg};
use crate::ledger::{ConfiguredLedger, ConsumeKind, FillLedger, LedgerEntry};

/// Audit record of a committed fill or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub hash: OrderHash,
    pub kind: ConsumeKind,
    pub maker: Address,
    pub caller: Address,
    /// Collaborator transfers performed (zero for cancels).
    pub transfers: usize,
    pub settled_at: DateTime<Utc>,
}

/// Result of a mutating entry point that did not hit an infrastructure error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Committed; the order hash is now consumed.
    Settled(Settlement),
    /// Validation refused the call. Nothing moved.
    Rejected { code: SwapCode, hash: OrderHash },
}

impl SwapOutcome {
    /// `OK` for settlements, the rejection code otherwise.
    #[must_use]
    pub fn code(&self) -> SwapCode {
        match self {
            Self::Settled(_) => SwapCode::Ok,
            Self::Rejected { code, .. } => *code,
        }
    }

    #[must_use]
    pub fn hash(&self) -> OrderHash {
        match self {
            Self::Settled(settlement) => settlement.hash,
            Self::Rejected { hash, .. } => *hash,
        }
    }

    #[must_use]
    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            Self::Settled(settlement) => Some(settlement),
            Self::Rejected { .. } => None,
        }
    }
}

/// The settlement engine.
///
/// Owns the collaborator registry and the fill ledger. Token legality is
/// decided by the configured asset list; the registry only supplies the
/// collaborators to call. Every mutating entry
/// point takes `&mut self`, so one executor is one serialization domain; see
/// [`SerializedExecutor`](crate::SerializedExecutor) for sharing across
/// threads.
pub struct SwapExecutor<L: FillLedger> {
    exchange: Address,
    config: SwapConfig,
    validator: OrderValidator,
    assets: AssetRegistry,
    ledger: L,
    clock: Box<dyn Clock>,
}

impl SwapExecutor<ConfiguredLedger> {
    /// Build an executor whose ledger is chosen by `config.ledger`.
    ///
    /// # Errors
    /// `Configuration` if the config is invalid or disagrees with `assets`;
    /// `Io` / `CorruptJournal` if the journal cannot be opened.
    pub fn from_config(config: &SwapConfig, assets: AssetRegistry) -> Result<Self> {
        let ledger = ConfiguredLedger::from_config(&config.ledger)?;
        Self::new(config, assets, ledger)
    }
}

impl<L: FillLedger> SwapExecutor<L> {
    /// Build an executor over an explicit ledger.
    ///
    /// # Errors
    /// `Configuration` if the config is invalid or disagrees with `assets`.
    pub fn new(config: &SwapConfig, assets: AssetRegistry, ledger: L) -> Result<Self> {
        config.validate()?;
        assets.check_against(config)?;
        info!(
            engine = ENGINE_NAME,
            version = VERSION,
            exchange = %config.exchange,
            scheme = ?config.signing_scheme,
            collaborators = assets.len(),
            consumed = ledger.len(),
            "Swap executor ready"
        );
        Ok(Self {
            exchange: config.exchange,
            config: config.clone(),
            validator: OrderValidator::from_config(config),
            assets,
            ledger,
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The engine's own address: the spender owners approve.
    #[must_use]
    pub fn exchange(&self) -> Address {
        self.exchange
    }

    #[must_use]
    pub fn validator(&self) -> &OrderValidator {
        &self.validator
    }

    #[must_use]
    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.assets
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Canonical digest of `order`.
    #[must_use]
    pub fn hash(&self, order: &Order) -> OrderHash {
        self.validator.hash(order)
    }

    /// Has `hash` been filled or cancelled?
    #[must_use]
    pub fn is_consumed(&self, hash: &OrderHash) -> bool {
        self.ledger.is_consumed(hash)
    }

    /// Fill-mode validation for `caller` at the current time.
    #[must_use]
    pub fn validate(&self, order: &Order, signature: &SignatureTriple, caller: Address) -> Validation {
        self.validator.validate_fill(
            &self.config,
            &self.ledger,
            order,
            signature,
            self.context(caller),
        )
    }

    /// Cancel-mode validation for `caller`.
    #[must_use]
    pub fn validate_cancel(
        &self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Validation {
        self.validator.validate_cancel(
            &self.config,
            &self.ledger,
            order,
            signature,
            self.context(caller),
        )
    }

    /// Dry run of [`fill`](Self::fill). Never mutates.
    ///
    /// # Errors
    /// `Transfer` if a collaborator would refuse one of the legs.
    pub fn simulate_fill(
        &self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<SwapCode> {
        let validation = self.validate(order, signature, caller);
        if !validation.is_ok() {
            return Ok(validation.code);
        }
        for leg in self.plan(order, caller)? {
            leg.check(&self.assets, self.exchange)
                .map_err(|source| SwapError::Transfer {
                    token: leg.token,
                    source,
                })?;
        }
        Ok(SwapCode::Ok)
    }

    /// Fill `order` as `caller`. Returns the protocol code.
    ///
    /// # Errors
    /// `Transfer` if a collaborator refused a leg (all completed legs have
    /// been reverted); `Ledger` if the commit failed (all legs reverted);
    /// `RollbackFailed` if reverting itself failed.
    pub fn fill(
        &mut self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<SwapCode> {
        self.fill_with_receipt(order, signature, caller)
            .map(|outcome| outcome.code())
    }

    /// [`fill`](Self::fill), returning the settlement record on success.
    pub fn fill_with_receipt(
        &mut self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<SwapOutcome> {
        let validation = self.validate(order, signature, caller);
        let hash = validation.hash;
        if !validation.is_ok() {
            warn!(order = %hash.short(), %caller, code = %validation.code, "Fill rejected");
            return Ok(SwapOutcome::Rejected {
                code: validation.code,
                hash,
            });
        }

        let legs = self.plan(order, caller)?;

        // Preflight: nothing has moved yet, so a refusal needs no rollback.
        for leg in &legs {
            if let Err(source) = leg.check(&self.assets, self.exchange) {
                warn!(order = %hash.short(), token = %leg.token, error = %source, "Fill preflight failed");
                return Err(SwapError::Transfer {
                    token: leg.token,
                    source,
                });
            }
        }

        let mut done: Vec<Leg> = Vec::with_capacity(legs.len());
        for leg in &legs {
            if let Err(source) = leg.execute(&mut self.assets, self.exchange) {
                warn!(
                    order = %hash.short(),
                    token = %leg.token,
                    completed = done.len(),
                    error = %source,
                    "Fill leg failed, rolling back"
                );
                self.rollback(&hash, &done)?;
                return Err(SwapError::Transfer {
                    token: leg.token,
                    source,
                });
            }
            done.push(*leg);
        }

        let settled_at = self.clock.now();
        if let Err(err) = self
            .ledger
            .consume(LedgerEntry::new(hash, ConsumeKind::Fill, settled_at))
        {
            error!(order = %hash.short(), error = %err, "Ledger commit failed, rolling back");
            self.rollback(&hash, &done)?;
            return Err(err);
        }

        info!(
            order = %hash.short(),
            maker = %order.maker,
            %caller,
            transfers = done.len(),
            "Order filled"
        );
        Ok(SwapOutcome::Settled(Settlement {
            hash,
            kind: ConsumeKind::Fill,
            maker: order.maker,
            caller,
            transfers: done.len(),
            settled_at,
        }))
    }

    /// Cancel `order` as `caller`. Returns the protocol code.
    ///
    /// # Errors
    /// `Ledger` if the cancel could not be persisted.
    pub fn cancel(
        &mut self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<SwapCode> {
        self.cancel_with_receipt(order, signature, caller)
            .map(|outcome| outcome.code())
    }

    /// [`cancel`](Self::cancel), returning the settlement record on success.
    pub fn cancel_with_receipt(
        &mut self,
        order: &Order,
        signature: &SignatureTriple,
        caller: Address,
    ) -> Result<SwapOutcome> {
        let validation = self.validate_cancel(order, signature, caller);
        let hash = validation.hash;
        if !validation.is_ok() {
            warn!(order = %hash.short(), %caller, code = %validation.code, "Cancel rejected");
            return Ok(SwapOutcome::Rejected {
                code: validation.code,
                hash,
            });
        }

        let settled_at = self.clock.now();
        self.ledger
            .consume(LedgerEntry::new(hash, ConsumeKind::Cancel, settled_at))?;

        info!(order = %hash.short(), maker = %order.maker, "Order cancelled");
        Ok(SwapOutcome::Settled(Settlement {
            hash,
            kind: ConsumeKind::Cancel,
            maker: order.maker,
            caller,
            transfers: 0,
            settled_at,
        }))
    }

    fn context(&self, caller: Address) -> CallContext {
        CallContext::new(caller, self.clock.unix_now())
    }

    fn plan(&self, order: &Order, caller: Address) -> Result<Vec<Leg>> {
        legs::plan(order, caller, &self.config).ok_or_else(|| {
            SwapError::Internal("validated order references an unconfigured token".to_string())
        })
    }

    /// Revert `done` in reverse order. Keeps going past individual failures
    /// so as much as possible is restored.
    fn rollback(&mut self, hash: &OrderHash, done: &[Leg]) -> Result<()> {
        let mut failures = Vec::new();
        for leg in done.iter().rev() {
            if let Err(err) = leg.revert(&mut self.assets, self.exchange) {
                failures.push(format!("{} {} -> {}: {err}", leg.token, leg.from, leg.to));
            }
        }
        if failures.is_empty() {
            return Ok(());
        }
        error!(
            order = %hash.short(),
            failed = failures.len(),
            reverted = done.len() - failures.len(),
            "Rollback incomplete"
        );
        Err(SwapError::RollbackFailed {
            reason: failures.join("; "),
        })
    }
}

impl<L: FillLedger + std::fmt::Debug> std::fmt::Debug for SwapExecutor<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapExecutor")
            .field("exchange", &self.exchange)
            .field("validator", &self.validator)
            .field("assets", &self.assets)
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}
