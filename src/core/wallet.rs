use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the wallet exposes, active account first.
    async fn request_accounts(&self) -> Result<Vec<String>>;
}
