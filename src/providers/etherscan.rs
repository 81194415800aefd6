use super::http_client;
use crate::core::network::GasOracle;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct GasOracleResponse {
    // A plain string on rate limits or bad keys
    result: Option<Value>,
}

/// Current gas prices from the Etherscan gas tracker.
pub struct EtherscanGasOracle {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl EtherscanGasOracle {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
            client: http_client()?,
        })
    }

    async fn fetch(&self) -> Result<Option<String>> {
        let mut url = format!("{}/api?module=gastracker&action=gasoracle", self.base_url);
        if let Some(key) = &self.api_key {
            url.push_str(&format!("&apikey={key}"));
        }
        let data = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<GasOracleResponse>()
            .await
            .context("Failed to parse gas oracle response")?;

        let gas = data
            .result
            .as_ref()
            .and_then(|r| r.get("ProposeGasPrice"))
            .and_then(|g| match g {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        Ok(gas)
    }
}

#[async_trait]
impl GasOracle for EtherscanGasOracle {
    async fn proposed_gas_price(&self) -> Option<String> {
        match self.fetch().await {
            Ok(gas) => gas,
            Err(e) => {
                debug!(error = %e, "Gas price unavailable");
                None
            }
        }
    }
}
