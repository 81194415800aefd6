//! Balance source abstraction

use crate::core::holding::TokenHolding;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// All token balances the provider reports for `address` on `chain`.
    /// `chain` is the provider's own chain key.
    async fn fetch_balances(&self, address: &str, chain: &str) -> Result<Vec<TokenHolding>>;
}
