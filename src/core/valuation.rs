//! Turns raw holdings and prices into USD values.
use crate::core::holding::TokenHolding;
use tracing::{debug, warn};

/// The priced value of a single visible holding.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenValue {
    pub holding: TokenHolding,
    pub balance: f64,
    pub price: f64,
    pub value: f64,
}

/// Per-token values and their sum.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Valuation {
    pub tokens: Vec<TokenValue>,
    pub total: f64,
}

impl Valuation {
    /// Tokens whose symbol contains `term`, ignoring case. An empty term keeps
    /// every token. The total is left untouched since it describes the whole
    /// portfolio, not the filtered view.
    pub fn filter_by_symbol(&self, term: &str) -> Vec<&TokenValue> {
        let term = term.to_lowercase();
        self.tokens
            .iter()
            .filter(|t| t.holding.symbol.to_lowercase().contains(&term))
            .collect()
    }
}

fn sanitize(symbol: &str, label: &str, amount: f64) -> f64 {
    if !amount.is_finite() || amount < 0.0 {
        warn!(symbol = %symbol, amount, "Discarding invalid {label}, using 0");
        0.0
    } else {
        amount
    }
}

/// Values every visible holding in USD.
///
/// Holdings matching `native_symbol` are priced with `native_usd_price`, all
/// others with their own unit price. Unknown prices count as zero. Invalid
/// intermediate results (negative, NaN, infinite) are logged and zeroed so a
/// single bad token never poisons the total.
pub fn valuate(
    holdings: &[TokenHolding],
    native_symbol: &str,
    native_usd_price: Option<f64>,
) -> Valuation {
    let mut valuation = Valuation::default();

    for holding in holdings.iter().filter(|h| h.is_visible()) {
        let price = if holding.symbol.eq_ignore_ascii_case(native_symbol) {
            native_usd_price
        } else {
            holding.unit_price_usd
        };
        let price = sanitize(&holding.symbol, "price", price.unwrap_or(0.0));
        let balance = sanitize(&holding.symbol, "balance", holding.displayed_balance());
        let value = sanitize(&holding.symbol, "value", balance * price);

        valuation.total += value;
        valuation.tokens.push(TokenValue {
            holding: holding.clone(),
            balance,
            price,
            value,
        });
    }

    debug!(
        tokens = valuation.tokens.len(),
        skipped = holdings.len() - valuation.tokens.len(),
        total = valuation.total,
        "Valuated holdings"
    );
    valuation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(raw: u128) -> TokenHolding {
        TokenHolding::new("ETH", raw, 18, None).with_contract("0x0")
    }

    #[test]
    fn test_native_asset_uses_native_price() {
        let holdings = vec![eth(2_000_000_000_000_000_000)];
        let valuation = valuate(&holdings, "ETH", Some(2000.0));

        assert_eq!(valuation.tokens.len(), 1);
        assert!((valuation.total - 4000.0).abs() < 1e-9);
        assert!((valuation.tokens[0].price - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_native_price_is_zero() {
        let holdings = vec![eth(1_000_000_000_000_000_000)];
        let valuation = valuate(&holdings, "ETH", None);
        assert_eq!(valuation.total, 0.0);
        assert_eq!(valuation.tokens[0].value, 0.0);
    }

    #[test]
    fn test_non_native_uses_own_price() {
        let holdings = vec![
            TokenHolding::new("USDC", 2_500_000, 6, Some(1.0)),
            TokenHolding::new("ARB", 10_000_000_000_000_000_000, 18, None),
        ];
        let valuation = valuate(&holdings, "ETH", Some(2000.0));

        assert_eq!(valuation.tokens.len(), 2);
        assert!((valuation.tokens[0].value - 2.5).abs() < 1e-9);
        assert_eq!(valuation.tokens[1].value, 0.0);
        assert!((valuation.total - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_excludes_zero_balances_and_zero_decimals() {
        let holdings = vec![
            TokenHolding::new("DUST", 0, 18, Some(5.0)),
            TokenHolding::new("NFT", 7, 0, Some(5.0)),
            TokenHolding::new("DAI", 1_000_000_000_000_000_000, 18, Some(1.0)),
        ];
        let valuation = valuate(&holdings, "ETH", Some(2000.0));

        assert_eq!(valuation.tokens.len(), 1);
        assert_eq!(valuation.tokens[0].holding.symbol, "DAI");
    }

    #[test]
    fn test_invalid_prices_become_zero() {
        let holdings = vec![
            TokenHolding::new("NEG", 1_000_000, 6, Some(-3.0)),
            TokenHolding::new("NAN", 1_000_000, 6, Some(f64::NAN)),
            TokenHolding::new("INF", 1_000_000, 6, Some(f64::INFINITY)),
            TokenHolding::new("OK", 1_000_000, 6, Some(2.0)),
        ];
        let valuation = valuate(&holdings, "ETH", None);

        assert_eq!(valuation.tokens.len(), 4);
        for token in &valuation.tokens[..3] {
            assert_eq!(token.value, 0.0);
        }
        assert!((valuation.total - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_valuate_is_deterministic_and_total_is_sum() {
        let holdings = vec![
            eth(1_234_567_890_000_000_000),
            TokenHolding::new("USDT", 99_990_000, 6, Some(0.9998)),
            TokenHolding::new("LINK", 3_300_000_000_000_000_000, 18, Some(14.2)),
        ];
        let first = valuate(&holdings, "ETH", Some(3150.25));
        let second = valuate(&holdings, "ETH", Some(3150.25));
        assert_eq!(first, second);

        let sum: f64 = first.tokens.iter().map(|t| t.value).sum();
        assert!((first.total - sum).abs() < 1e-6);
    }

    #[test]
    fn test_native_match_ignores_case() {
        let holdings = vec![TokenHolding::new("matic", 1_000_000_000_000_000_000, 18, Some(9.0))];
        let valuation = valuate(&holdings, "MATIC", Some(0.5));
        assert!((valuation.total - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_filter_by_symbol() {
        let holdings = vec![
            TokenHolding::new("USDC", 1_000_000, 6, Some(1.0)),
            TokenHolding::new("USDT", 1_000_000, 6, Some(1.0)),
            TokenHolding::new("DAI", 1_000_000_000_000_000_000, 18, Some(1.0)),
        ];
        let valuation = valuate(&holdings, "ETH", None);

        let usd: Vec<_> = valuation
            .filter_by_symbol("usd")
            .iter()
            .map(|t| t.holding.symbol.as_str())
            .collect();
        assert_eq!(usd, vec!["USDC", "USDT"]);
        assert_eq!(valuation.filter_by_symbol("").len(), 3);
        assert!(valuation.filter_by_symbol("btc").is_empty());
    }
}
