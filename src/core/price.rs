//! Pricing abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Current USD prices keyed by price source id. Ids the source does not know
/// are simply absent.
pub type UsdPrices = HashMap<String, f64>;

#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_usd_prices(&self, ids: &[String]) -> Result<UsdPrices>;
}

/// Daily USD closes over the last week, used for sparklines.
#[async_trait]
pub trait SparklineProvider: Send + Sync {
    /// `Ok(None)` when the symbol has no known price history.
    async fn fetch_sparkline(&self, symbol: &str) -> Result<Option<Vec<f64>>>;
}
