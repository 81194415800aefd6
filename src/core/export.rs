//! CSV export of the visible holdings.
use crate::core::valuation::TokenValue;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CSV_HEADER: [&str; 6] = [
    "Token",
    "Balance",
    "PriceUSD",
    "ValueUSD",
    "ContractAddress",
    "Chain",
];

/// `chainport_{first six chars of address}_{chain}.csv`, with `snapshot`
/// standing in for a missing address.
pub fn export_file_name(address: Option<&str>, chain: &str) -> String {
    let prefix: String = match address {
        Some(a) if !a.is_empty() => a.chars().take(6).collect(),
        _ => "snapshot".to_string(),
    };
    format!("chainport_{prefix}_{chain}.csv")
}

/// Renders holdings as CSV. Every field is quoted with embedded quotes
/// doubled; balances carry four decimals, prices and values their shortest
/// exact form.
pub fn holdings_to_csv(tokens: &[TokenValue], chain: &str) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for token in tokens {
        writer.write_record([
            token.holding.symbol.clone(),
            format!("{:.4}", token.balance),
            token.price.to_string(),
            token.value.to_string(),
            token.holding.contract_address.clone(),
            chain.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV output: {e}"))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Writes the CSV into `dir` and returns the full path of the new file.
pub fn write_csv(
    dir: &Path,
    tokens: &[TokenValue],
    address: Option<&str>,
    chain: &str,
) -> Result<PathBuf> {
    let path = dir.join(export_file_name(address, chain));
    let csv = holdings_to_csv(tokens, chain)?;
    std::fs::write(&path, csv)
        .with_context(|| format!("Failed to write CSV export to {}", path.display()))?;
    info!(path = %path.display(), rows = tokens.len(), "Exported holdings");
    Ok(path)
}
