//! Rendering capability the controller drives.

use crate::core::chain::ChainInfo;
use crate::core::history::{HistoryLog, PerformanceSummary};
use crate::core::valuation::Valuation;
use std::collections::HashMap;

/// Everything needed to draw one loaded portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioView<'a> {
    pub address: &'a str,
    pub chain: &'a ChainInfo,
    pub native_price: Option<f64>,
    pub valuation: &'a Valuation,
    /// Weekly price series keyed by token symbol. Tokens without one are absent.
    pub sparklines: &'a HashMap<String, Vec<f64>>,
    pub ens_name: Option<&'a str>,
    pub performance: PerformanceSummary,
}

pub trait Presenter: Send + Sync {
    fn show_loading(&self, address: &str, chain: &ChainInfo);
    fn render_portfolio(&self, view: &PortfolioView<'_>);
    fn render_history(&self, log: &HistoryLog, performance: PerformanceSummary);
    /// A load failed; whatever was shown before stays valid.
    fn show_failure(&self, message: &str);
    /// Something the user must act on, e.g. a missing wallet provider.
    fn show_notice(&self, message: &str);
    fn show_gas_price(&self, gwei: Option<&str>);
}
