use super::http_client;
use crate::core::wallet::WalletProvider;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Vec<String>>,
    error: Option<RpcError>,
}

/// A wallet reachable over JSON-RPC, such as a local Frame or node endpoint.
pub struct JsonRpcWallet {
    rpc_url: String,
    client: reqwest::Client,
}

impl JsonRpcWallet {
    pub fn new(rpc_url: &str) -> Result<Self> {
        Ok(Self {
            rpc_url: rpc_url.to_string(),
            client: http_client()?,
        })
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<String>> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_requestAccounts",
            "params": [],
        });
        debug!(url = %self.rpc_url, "Requesting wallet accounts");

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Wallet provider unreachable at {}", self.rpc_url))?
            .error_for_status()?
            .json::<RpcResponse>()
            .await
            .context("Failed to parse wallet response")?;

        if let Some(error) = response.error {
            return Err(anyhow!(
                "Wallet rejected account request ({}): {}",
                error.code,
                error.message
            ));
        }
        Ok(response.result.unwrap_or_default())
    }
}
