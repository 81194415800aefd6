use super::http_client;
use crate::core::balance::BalanceProvider;
use crate::core::holding::{TokenHolding, parse_raw_balance};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

#[derive(Debug, Deserialize)]
struct BalancesResponse {
    data: Option<BalancesData>,
    #[serde(default)]
    error: bool,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BalancesData {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct BalanceItem {
    contract_ticker_symbol: Option<String>,
    balance: Option<Value>,
    contract_decimals: Option<u32>,
    quote_rate: Option<f64>,
    contract_address: Option<String>,
    logo_url: Option<String>,
}

impl From<BalanceItem> for TokenHolding {
    fn from(item: BalanceItem) -> Self {
        let raw_balance = match item.balance {
            Some(Value::String(s)) => parse_raw_balance(&s),
            Some(Value::Number(n)) => parse_raw_balance(&n.to_string()),
            _ => 0,
        };
        TokenHolding {
            symbol: item.contract_ticker_symbol.unwrap_or_default(),
            raw_balance,
            decimals: item.contract_decimals.unwrap_or(0),
            unit_price_usd: item.quote_rate,
            contract_address: item.contract_address.unwrap_or_default(),
            logo_url: item.logo_url.filter(|url| !url.is_empty()),
        }
    }
}

/// Token balances from the Covalent `balances_v2` endpoint.
pub struct CovalentProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl CovalentProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: http_client()?,
        })
    }
}

#[async_trait]
impl BalanceProvider for CovalentProvider {
    #[instrument(name = "CovalentBalanceFetch", skip(self))]
    async fn fetch_balances(&self, address: &str, chain: &str) -> Result<Vec<TokenHolding>> {
        let url = format!(
            "{}/v1/{}/address/{}/balances_v2/",
            self.base_url, chain, address
        );
        debug!("Requesting balances from {}", url);

        let response = self
            .client
            .get(format!("{url}?key={}", self.api_key))
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for address: {} URL: {}", e, address, url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to get response text")?;
        if !status.is_success() {
            error!(%status, response = %body, "Balance request failed");
            bail!("Balance request failed with status {status}");
        }

        let parsed: BalancesResponse = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %body, "Failed to parse balance response");
                return Err(e).context("Failed to parse balance response");
            }
        };
        if parsed.error {
            bail!(
                "Balance provider error: {}",
                parsed.error_message.unwrap_or_default()
            );
        }

        let items = parsed.data.map(|d| d.items).unwrap_or_default();
        let total = items.len();
        let holdings: Vec<TokenHolding> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<BalanceItem>(item) {
                Ok(item) => Some(item.into()),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed balance item");
                    None
                }
            })
            .collect();
        debug!(items = total, parsed = holdings.len(), "Received balances");
        Ok(holdings)
    }
}
