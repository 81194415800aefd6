//! Best-effort chain context shown next to a portfolio.

use async_trait::async_trait;

#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Primary ENS name for `address`, if any. Failures resolve to `None`.
    async fn resolve_name(&self, address: &str) -> Option<String>;
}

#[async_trait]
pub trait GasOracle: Send + Sync {
    /// Proposed gas price in Gwei as reported by the oracle.
    async fn proposed_gas_price(&self) -> Option<String>;
}
