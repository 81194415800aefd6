use serde::{Deserialize, Serialize};

/// One token balance owned by an address on a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub symbol: String,
    /// Balance in the token's smallest unit.
    pub raw_balance: u128,
    pub decimals: u32,
    pub unit_price_usd: Option<f64>,
    pub contract_address: String,
    pub logo_url: Option<String>,
}

impl TokenHolding {
    pub fn new(symbol: &str, raw_balance: u128, decimals: u32, unit_price_usd: Option<f64>) -> Self {
        Self {
            symbol: symbol.to_string(),
            raw_balance,
            decimals,
            unit_price_usd,
            contract_address: String::new(),
            logo_url: None,
        }
    }

    pub fn with_contract(mut self, contract_address: &str) -> Self {
        self.contract_address = contract_address.to_string();
        self
    }

    /// `raw_balance / 10^decimals`.
    pub fn displayed_balance(&self) -> f64 {
        let exponent = i32::try_from(self.decimals).unwrap_or(i32::MAX);
        self.raw_balance as f64 / 10f64.powi(exponent)
    }

    /// Zero balances and zero-decimal tokens are placeholder noise (NFTs,
    /// dust airdrops) and never shown.
    pub fn is_visible(&self) -> bool {
        self.raw_balance > 0 && self.decimals > 0
    }
}

/// Parses a provider balance that may arrive as an integer string, a float
/// string or in exponent form. Anything unusable, including negatives, is 0.
pub fn parse_raw_balance(raw: &str) -> u128 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u128>() {
        return value;
    }
    match trimmed.parse::<f64>() {
        // `as` saturates at u128::MAX
        Ok(value) if value.is_finite() && value > 0.0 => value as u128,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_displayed_balance() {
        let eth = TokenHolding::new("ETH", 2_000_000_000_000_000_000, 18, None);
        assert!((eth.displayed_balance() - 2.0).abs() < 1e-12);

        let usdc = TokenHolding::new("USDC", 1_500_000, 6, Some(1.0));
        assert!((usdc.displayed_balance() - 1.5).abs() < 1e-12);

        let huge = TokenHolding::new("ODD", 5, u32::MAX, None);
        assert_eq!(huge.displayed_balance(), 0.0);
    }

    #[test]
    fn test_visibility() {
        assert!(TokenHolding::new("DAI", 1, 18, None).is_visible());
        assert!(!TokenHolding::new("DAI", 0, 18, None).is_visible());
        assert!(!TokenHolding::new("PUNK", 3, 0, None).is_visible());
    }

    #[test]
    fn test_parse_raw_balance() {
        assert_eq!(parse_raw_balance("2000000000000000000"), 2_000_000_000_000_000_000);
        assert_eq!(parse_raw_balance(" 42 "), 42);
        assert_eq!(parse_raw_balance("1e3"), 1000);
        assert_eq!(parse_raw_balance("-5"), 0);
        assert_eq!(parse_raw_balance(""), 0);
        assert_eq!(parse_raw_balance("abc"), 0);
        assert_eq!(parse_raw_balance("1e60"), u128::MAX);
    }
}
