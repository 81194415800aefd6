use super::http_client;
use crate::core::network::NameResolver;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    name: Option<String>,
}

/// Reverse ENS lookups through the ensideas API.
pub struct EnsIdeasResolver {
    base_url: String,
    client: reqwest::Client,
}

impl EnsIdeasResolver {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }

    async fn lookup(&self, address: &str) -> Result<Option<String>> {
        let url = format!("{}/ens/resolve/{}", self.base_url, address);
        let data = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<ResolveResponse>()
            .await
            .context("Failed to parse ENS response")?;
        Ok(data.name.filter(|n| !n.is_empty()))
    }
}

#[async_trait]
impl NameResolver for EnsIdeasResolver {
    async fn resolve_name(&self, address: &str) -> Option<String> {
        match self.lookup(address).await {
            Ok(name) => name,
            Err(e) => {
                debug!(address, error = %e, "ENS lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_resolve_name() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ens/resolve/0xd8da"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"address":"0xd8da","name":"vitalik.eth","displayName":"vitalik.eth"}"#,
            ))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ens/resolve/0xnone"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"name":null}"#))
            .mount(&mock_server)
            .await;

        let resolver = EnsIdeasResolver::new(&mock_server.uri()).unwrap();
        assert_eq!(
            resolver.resolve_name("0xd8da").await.as_deref(),
            Some("vitalik.eth")
        );
        assert!(resolver.resolve_name("0xnone").await.is_none());
        // Unmatched requests get a 404 from the mock server
        assert!(resolver.resolve_name("0xmissing").await.is_none());
    }
}
