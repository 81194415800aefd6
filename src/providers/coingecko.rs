use super::http_client;
use crate::core::cache::Cache;
use crate::core::price::{PriceProvider, SparklineProvider, UsdPrices};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// CoinGecko ids for the symbols that get a sparkline.
fn sparkline_id(symbol: &str) -> Option<&'static str> {
    match symbol.to_uppercase().as_str() {
        "ETH" => Some("ethereum"),
        "MATIC" => Some("matic-network"),
        "ARB" => Some("arbitrum"),
        "USDC" => Some("usd-coin"),
        "USDT" => Some("tether"),
        "DAI" => Some("dai"),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct SimplePriceEntry {
    usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

pub struct CoinGeckoProvider {
    base_url: String,
    client: reqwest::Client,
    sparkline_cache: Arc<Cache<String, Vec<f64>>>,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, sparkline_cache: Arc<Cache<String, Vec<f64>>>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
            sparkline_cache,
        })
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoPriceFetch", skip(self))]
    async fn fetch_usd_prices(&self, ids: &[String]) -> Result<UsdPrices> {
        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd",
            self.base_url,
            ids.join(",")
        );
        debug!("Requesting prices from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?
            .error_for_status()
            .context("Price request failed")?;

        let body = response
            .text()
            .await
            .context("Failed to get response text")?;
        let entries: HashMap<String, SimplePriceEntry> = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %body, "Failed to parse price response");
                return Err(e).context("Failed to parse price response");
            }
        };

        Ok(entries
            .into_iter()
            .filter_map(|(id, entry)| entry.usd.map(|usd| (id, usd)))
            .collect())
    }
}

#[async_trait]
impl SparklineProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoSparklineFetch", skip(self))]
    async fn fetch_sparkline(&self, symbol: &str) -> Result<Option<Vec<f64>>> {
        let Some(id) = sparkline_id(symbol) else {
            return Ok(None);
        };
        if let Some(cached) = self.sparkline_cache.get(&id.to_string()).await {
            return Ok(Some(cached));
        }

        let url = format!(
            "{}/api/v3/coins/{}/market_chart?vs_currency=usd&days=7&interval=daily",
            self.base_url, id
        );
        debug!("Requesting sparkline from {}", url);

        let data = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?
            .error_for_status()
            .context("Sparkline request failed")?
            .json::<MarketChartResponse>()
            .await
            .context("Failed to parse sparkline response")?;

        let prices: Vec<f64> = data.prices.into_iter().map(|(_, price)| price).collect();
        self.sparkline_cache.put(id.to_string(), prices.clone()).await;
        Ok(Some(prices))
    }
}
