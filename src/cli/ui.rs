use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Placeholder for values that could not be loaded.
pub const PLACEHOLDER: &str = "—";

const SPARK_TICKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Notice,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Notice => style(text).yellow().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell for numeric values.
pub fn number_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Formats a percentage change, `N/A` when undefined.
pub fn format_change(change: Option<f64>) -> String {
    change.map_or("N/A".to_string(), |c| format!("{c:.2}%"))
}

/// Colours a change string green or red by sign.
pub fn style_change(change: Option<f64>) -> String {
    let text = format_change(change);
    match change {
        Some(c) if c >= 0.0 => style(text).green().to_string(),
        Some(_) => style(text).red().to_string(),
        None => style(text).dim().to_string(),
    }
}

/// `$1234.57`, or the placeholder for an unknown amount.
pub fn format_usd(value: Option<f64>) -> String {
    value.map_or(PLACEHOLDER.to_string(), |v| format!("${v:.2}"))
}

/// `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Draws a series as a one-line block chart scaled between its min and max.
pub fn sparkline(values: &[f64]) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return String::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let top = (SPARK_TICKS.len() - 1) as f64;

    finite
        .iter()
        .map(|v| {
            if range == 0.0 {
                SPARK_TICKS[SPARK_TICKS.len() / 2]
            } else {
                SPARK_TICKS[(((v - min) / range) * top).round() as usize]
            }
        })
        .collect()
}

/// Creates a spinner shown while a portfolio loads.
pub fn new_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]), "▁▂▃▄▅▆▇█");
        assert_eq!(sparkline(&[5.0, 5.0, 5.0]), "▅▅▅");
        assert_eq!(sparkline(&[]), "");
        assert_eq!(sparkline(&[f64::NAN, 1.0, 2.0]), "▁█");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_usd(Some(1234.567)), "$1234.57");
        assert_eq!(format_usd(None), PLACEHOLDER);
        assert_eq!(format_change(Some(10.0)), "10.00%");
        assert_eq!(format_change(None), "N/A");
    }
}
