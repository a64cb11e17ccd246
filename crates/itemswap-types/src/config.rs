//! Configuration for an ItemSwap settlement engine.
//!
//! Loaded from JSON:
//!
//! ```json
//! {
//!   "exchange": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
//!   "signingScheme": "eth_sign",
//!   "assets": [
//!     { "address": "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512", "class": "fungible", "name": "VU" },
//!     { "address": "0x9fe46736679d2d9a65f0992f2272de9f3c7fa6e0", "class": "item" }
//!   ],
//!   "ledger": { "journalPath": "/var/lib/itemswap/fills.jsonl" }
//! }
//! ```

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{constants, AssetClass, AssetDirectory, Result, SigningScheme, SwapError};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapConfig {
    /// The engine's own address: the `spender` that owners approve, and the
    /// domain mixed into every order hash.
    #[serde(default = "default_exchange")]
    pub exchange: Address,
    #[serde(default)]
    pub signing_scheme: SigningScheme,
    /// Recognized collaborator contracts.
    pub assets: Vec<AssetEntry>,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

fn default_exchange() -> Address {
    constants::DEFAULT_EXCHANGE
}

/// One recognized collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub address: Address,
    pub class: AssetClass,
    /// Display name for logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Settlement ledger storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Append-only journal file. `None` keeps the ledger in memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_path: Option<PathBuf>,
}

impl SwapConfig {
    /// In-memory config with one fungible and one item collaborator.
    #[must_use]
    pub fn new(exchange: Address, fungible: Address, item: Address) -> Self {
        Self {
            exchange,
            signing_scheme: SigningScheme::default(),
            assets: vec![
                AssetEntry {
                    address: fungible,
                    class: AssetClass::Fungible,
                    name: None,
                },
                AssetEntry {
                    address: item,
                    class: AssetClass::Item,
                    name: None,
                },
            ],
            ledger: LedgerConfig::default(),
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SwapError::Configuration(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SwapError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// Structural checks: no zero or duplicate asset addresses, and at
    /// least one collaborator of each class.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.assets.len());
        for entry in &self.assets {
            if entry.address.is_zero() {
                return Err(SwapError::Configuration(
                    "asset address must not be zero".to_string(),
                ));
            }
            if !seen.insert(entry.address) {
                return Err(SwapError::Configuration(format!(
                    "asset {} listed more than once",
                    entry.address
                )));
            }
        }
        for class in [AssetClass::Fungible, AssetClass::Item] {
            if !self.assets.iter().any(|a| a.class == class) {
                return Err(SwapError::Configuration(format!(
                    "no {class} asset configured"
                )));
            }
        }
        Ok(())
    }
}

impl AssetDirectory for SwapConfig {
    fn class_of(&self, token: &Address) -> Option<AssetClass> {
        self.assets
            .iter()
            .find(|a| a.address == *token)
            .map(|a| a.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "exchange": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
        "signingScheme": "prehashed",
        "assets": [
            { "address": "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512", "class": "fungible", "name": "VU" },
            { "address": "0x9fe46736679d2d9a65f0992f2272de9f3c7fa6e0", "class": "item" }
        ],
        "ledger": { "journalPath": "/tmp/fills.jsonl" }
    }"#;

    #[test]
    fn parses_sample() {
        let cfg = SwapConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(cfg.signing_scheme, SigningScheme::Prehashed);
        assert_eq!(cfg.assets.len(), 2);
        assert_eq!(cfg.assets[0].name.as_deref(), Some("VU"));
        assert_eq!(
            cfg.ledger.journal_path.as_deref(),
            Some(Path::new("/tmp/fills.jsonl"))
        );
    }

    #[test]
    fn defaults_apply() {
        let cfg = SwapConfig::from_json_str(
            r#"{ "assets": [
                { "address": "0x0101010101010101010101010101010101010101", "class": "fungible" },
                { "address": "0x0202020202020202020202020202020202020202", "class": "item" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(cfg.exchange, Address::ZERO);
        assert_eq!(cfg.signing_scheme, SigningScheme::EthSign);
        assert!(cfg.ledger.journal_path.is_none());
    }

    #[test]
    fn class_lookup() {
        let cfg = SwapConfig::new(
            Address::repeat_byte(9),
            Address::repeat_byte(1),
            Address::repeat_byte(2),
        );
        assert_eq!(cfg.class_of(&Address::repeat_byte(1)), Some(AssetClass::Fungible));
        assert_eq!(cfg.class_of(&Address::repeat_byte(2)), Some(AssetClass::Item));
        assert_eq!(cfg.class_of(&Address::repeat_byte(3)), None);
    }

    #[test]
    fn duplicate_asset_rejected() {
        let mut cfg = SwapConfig::new(
            Address::ZERO,
            Address::repeat_byte(1),
            Address::repeat_byte(2),
        );
        cfg.assets.push(AssetEntry {
            address: Address::repeat_byte(1),
            class: AssetClass::Item,
            name: None,
        });
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, SwapError::Configuration(_)));
    }

    #[test]
    fn missing_class_rejected() {
        let mut cfg = SwapConfig::new(
            Address::ZERO,
            Address::repeat_byte(1),
            Address::repeat_byte(2),
        );
        cfg.assets.retain(|a| a.class == AssetClass::Fungible);
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("ITEM"), "Got: {msg}");
    }

    #[test]
    fn garbage_json_is_configuration_error() {
        let err = SwapConfig::from_json_str("{ nope").unwrap_err();
        assert!(err.to_string().starts_with("SWAP_ERR_902"));
    }
}
