//! Terminal rendering of portfolios and history.
use super::ui;
use crate::core::chain::ChainInfo;
use crate::core::history::{HistoryLog, PerformanceSummary};
use crate::core::presenter::{PortfolioView, Presenter};
use comfy_table::{Cell, Table};
use indicatif::ProgressBar;
use std::sync::Mutex;

/// Writes every update to stdout. An optional search term limits which
/// token rows are drawn.
#[derive(Default)]
pub struct TerminalPresenter {
    search: Option<String>,
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalPresenter {
    pub fn new(search: Option<String>) -> Self {
        Self {
            search,
            spinner: Mutex::new(None),
        }
    }

    fn stop_spinner(&self) {
        let mut spinner = self
            .spinner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pb) = spinner.take() {
            pb.finish_and_clear();
        }
    }
}

/// Builds the holdings table for a loaded portfolio.
pub fn holdings_table(view: &PortfolioView<'_>, search: Option<&str>) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Token"),
        ui::header_cell("Balance"),
        ui::header_cell("Price (USD)"),
        ui::header_cell("Value (USD)"),
        ui::header_cell("7d"),
    ]);

    for token in view.valuation.filter_by_symbol(search.unwrap_or_default()) {
        let spark = view
            .sparklines
            .get(&token.holding.symbol)
            .map(|prices| ui::sparkline(prices))
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&token.holding.symbol),
            ui::number_cell(format!("{:.4}", token.balance)),
            ui::number_cell(format!("${:.2}", token.price)),
            ui::number_cell(format!("${:.2}", token.value)),
            Cell::new(spark),
        ]);
    }
    table
}

/// `24h: 1.25% • 7d: N/A`
pub fn performance_line(performance: PerformanceSummary) -> String {
    format!(
        "24h: {} • 7d: {}",
        ui::style_change(performance.change_24h),
        ui::style_change(performance.change_7d)
    )
}

impl Presenter for TerminalPresenter {
    fn show_loading(&self, address: &str, chain: &ChainInfo) {
        let pb = ui::new_spinner(format!(
            "Loading {} on {}...",
            ui::short_address(address),
            chain.key
        ));
        let mut spinner = self
            .spinner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = spinner.replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn render_portfolio(&self, view: &PortfolioView<'_>) {
        self.stop_spinner();

        let ens = view
            .ens_name
            .map_or(String::new(), |name| format!(" ({name})"));
        println!(
            "Viewing: {}{} on {}",
            ui::style_text(&ui::short_address(view.address), ui::StyleType::Title),
            ens,
            ui::style_text(&view.chain.key, ui::StyleType::TotalLabel)
        );
        println!(
            "{} Price: {}",
            view.chain.native_symbol,
            ui::format_usd(view.native_price)
        );
        println!();

        if view.valuation.tokens.is_empty() {
            println!(
                "{}",
                ui::style_text("No tokens with a balance on this chain.", ui::StyleType::Subtle)
            );
        } else {
            println!("{}", holdings_table(view, self.search.as_deref()));
        }

        println!(
            "\n{}: {}",
            ui::style_text("Total Value", ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::format_usd(Some(view.valuation.total)),
                ui::StyleType::TotalValue
            )
        );
        println!("{}", performance_line(view.performance));
    }

    fn render_history(&self, log: &HistoryLog, performance: PerformanceSummary) {
        let (Some(first), Some(last)) = (log.entries().first(), log.latest()) else {
            println!(
                "{}",
                ui::style_text("No portfolio history recorded yet.", ui::StyleType::Subtle)
            );
            return;
        };
        let values: Vec<f64> = log.entries().iter().map(|s| s.value).collect();
        println!(
            "\nPortfolio Value (USD) {} {} to {} ({} points, latest {})",
            ui::sparkline(&values),
            first.time.format("%b %-d, %-I:%M %p"),
            last.time.format("%b %-d, %-I:%M %p"),
            log.len(),
            ui::format_usd(Some(last.value))
        );
        println!("{}", performance_line(performance));
    }

    fn show_failure(&self, message: &str) {
        self.stop_spinner();
        eprintln!("{}", ui::style_text(message, ui::StyleType::Error));
    }

    fn show_notice(&self, message: &str) {
        self.stop_spinner();
        println!("{}", ui::style_text(message, ui::StyleType::Notice));
    }

    fn show_gas_price(&self, gwei: Option<&str>) {
        match gwei {
            Some(gwei) => println!("Gas Price: {gwei} Gwei"),
            None => println!("Gas Price: {}", ui::PLACEHOLDER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::holding::TokenHolding;
    use crate::core::valuation::valuate;
    use std::collections::HashMap;

    #[test]
    fn test_holdings_table_applies_search() {
        let holdings = vec![
            TokenHolding::new("ETH", 1_000_000_000_000_000_000, 18, None),
            TokenHolding::new("USDC", 2_000_000, 6, Some(1.0)),
        ];
        let valuation = valuate(&holdings, "ETH", Some(2500.0));
        let chain = ChainInfo::new("eth-mainnet", "ETH", "ethereum");
        let mut sparklines = HashMap::new();
        sparklines.insert("ETH".to_string(), vec![1.0, 2.0]);
        let view = PortfolioView {
            address: "0xabc",
            chain: &chain,
            native_price: Some(2500.0),
            valuation: &valuation,
            sparklines: &sparklines,
            ens_name: None,
            performance: PerformanceSummary::default(),
        };

        let all = holdings_table(&view, None).to_string();
        assert!(all.contains("ETH"));
        assert!(all.contains("USDC"));
        assert!(all.contains("$2500.00"));
        assert!(all.contains("1.0000"));
        assert!(all.contains("▁█"));

        let filtered = holdings_table(&view, Some("usd")).to_string();
        assert!(!filtered.contains("$2500.00"));
        assert!(filtered.contains("USDC"));
    }

    #[test]
    fn test_performance_line() {
        let line = performance_line(PerformanceSummary {
            change_24h: Some(10.0),
            change_7d: None,
        });
        let plain = console::strip_ansi_codes(&line);
        assert_eq!(plain, "24h: 10.00% • 7d: N/A");
    }
}
