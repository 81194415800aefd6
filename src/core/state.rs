//! Persisted client state abstractions

use anyhow::Result;
use async_trait::async_trait;

pub const LAST_ADDRESS_KEY: &str = "lastAddress";
pub const LAST_CHAIN_KEY: &str = "lastChain";
pub const HISTORY_KEY: &str = "portfolioHistory";

/// A small string-valued key-value store that outlives the process.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
