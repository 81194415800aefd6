//! Shareable links that open a read-only view of an address.
use anyhow::{Context, Result};
use url::Url;

/// The `address` and `chain` query parameters of a share link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkParams {
    pub address: Option<String>,
    pub chain: Option<String>,
}

impl LinkParams {
    pub fn parse(link: &str) -> Result<Self> {
        let url = Url::parse(link).with_context(|| format!("Invalid link: {link}"))?;
        let mut params = LinkParams::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "address" if !value.is_empty() => params.address = Some(value.into_owned()),
                "chain" if !value.is_empty() => params.chain = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(params)
    }
}

/// Sets `address` and `chain` on `base`, keeping any other parameters it
/// already carries.
pub fn share_link(base: &str, address: &str, chain: &str) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("Invalid share base URL: {base}"))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "address" && k != "chain")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("address", address)
        .append_pair("chain", chain);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link() {
        let params =
            LinkParams::parse("https://chainport.app/?address=0xabc&chain=matic-mainnet").unwrap();
        assert_eq!(params.address.as_deref(), Some("0xabc"));
        assert_eq!(params.chain.as_deref(), Some("matic-mainnet"));

        let empty = LinkParams::parse("https://chainport.app/?address=").unwrap();
        assert_eq!(empty, LinkParams::default());

        assert!(LinkParams::parse("not a url").is_err());
    }

    #[test]
    fn test_share_link_replaces_existing_params() {
        let url = share_link(
            "https://chainport.app/view?theme=dark&address=0xold",
            "0xnew",
            "eth-mainnet",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://chainport.app/view?theme=dark&address=0xnew&chain=eth-mainnet"
        );

        let params = LinkParams::parse(url.as_str()).unwrap();
        assert_eq!(params.address.as_deref(), Some("0xnew"));
    }
}
