//! Supported chains and the chain selection state.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::warn;

/// A chain as the balance provider names it, plus how to price its native asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Opaque provider key, e.g. `eth-mainnet`.
    pub key: String,
    pub native_symbol: String,
    /// Price source id of the native asset, e.g. `ethereum`.
    pub native_price_id: String,
}

impl ChainInfo {
    pub fn new(key: &str, native_symbol: &str, native_price_id: &str) -> Self {
        Self {
            key: key.to_string(),
            native_symbol: native_symbol.to_string(),
            native_price_id: native_price_id.to_string(),
        }
    }

    pub fn defaults() -> Vec<ChainInfo> {
        vec![
            ChainInfo::new("eth-mainnet", "ETH", "ethereum"),
            ChainInfo::new("matic-mainnet", "MATIC", "matic-network"),
            ChainInfo::new("arbitrum-mainnet", "ETH", "ethereum"),
        ]
    }

    /// Entry for a key that is not configured. Assumes an ETH-native chain.
    pub fn unlisted(key: &str) -> Self {
        Self::new(key, "ETH", "ethereum")
    }
}

impl Display for ChainInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Where the initial chain came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOrigin {
    Link,
    Persisted,
    Default,
}

/// The currently selected chain. Every configured chain is a state; selection
/// moves between them freely and there is no terminal state.
#[derive(Debug, Clone)]
pub struct ChainSelection {
    chains: Vec<ChainInfo>,
    current: ChainInfo,
}

impl ChainSelection {
    /// Picks the initial chain: link parameter, then persisted choice, then the
    /// configured default.
    pub fn initial(
        chains: Vec<ChainInfo>,
        from_link: Option<&str>,
        persisted: Option<&str>,
        default_key: &str,
    ) -> (Self, ChainOrigin) {
        let (key, origin) = match (from_link, persisted) {
            (Some(k), _) if !k.is_empty() => (k, ChainOrigin::Link),
            (_, Some(k)) if !k.is_empty() => (k, ChainOrigin::Persisted),
            _ => (default_key, ChainOrigin::Default),
        };
        let mut selection = Self {
            current: ChainInfo::unlisted(default_key),
            chains,
        };
        selection.select(key);
        (selection, origin)
    }

    pub fn current(&self) -> &ChainInfo {
        &self.current
    }

    pub fn available(&self) -> &[ChainInfo] {
        &self.chains
    }

    /// Moves to `key`. Keys missing from the configured list are still
    /// accepted since the provider may know them.
    pub fn select(&mut self, key: &str) -> &ChainInfo {
        self.current = match self.chains.iter().find(|c| c.key == key) {
            Some(chain) => chain.clone(),
            None => {
                warn!(chain = %key, "Selected chain is not configured, assuming ETH native asset");
                ChainInfo::unlisted(key)
            }
        };
        &self.current
    }

    /// Price source ids for every configured native asset, deduplicated.
    pub fn price_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self
            .chains
            .iter()
            .chain(std::iter::once(&self.current))
            .map(|c| &c.native_price_id)
        {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}
