pub mod coingecko;
pub mod covalent;
pub mod ensideas;
pub mod etherscan;
pub mod json_rpc_wallet;

use anyhow::{Context, Result};
use std::time::Duration;

/// Shared HTTP client settings for every provider.
pub(crate) fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("chainport/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(20))
        .build()
        .context("Failed to build HTTP client")
}
