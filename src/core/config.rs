use crate::core::chain::ChainInfo;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com";
pub const DEFAULT_COVALENT_URL: &str = "https://api.covalenthq.com";
pub const DEFAULT_ENSIDEAS_URL: &str = "https://api.ensideas.com";
pub const DEFAULT_ETHERSCAN_URL: &str = "https://api.etherscan.io";
pub const DEFAULT_SHARE_BASE_URL: &str = "https://chainport.app/";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CovalentProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EnsIdeasProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EtherscanProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WalletProviderConfig {
    pub rpc_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub coingecko: Option<CoinGeckoProviderConfig>,
    pub covalent: Option<CovalentProviderConfig>,
    pub ensideas: Option<EnsIdeasProviderConfig>,
    pub etherscan: Option<EtherscanProviderConfig>,
    #[serde(default)]
    pub wallet: Option<WalletProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: DEFAULT_COINGECKO_URL.to_string(),
            }),
            covalent: Some(CovalentProviderConfig {
                base_url: DEFAULT_COVALENT_URL.to_string(),
                api_key: String::new(),
            }),
            ensideas: Some(EnsIdeasProviderConfig {
                base_url: DEFAULT_ENSIDEAS_URL.to_string(),
            }),
            etherscan: Some(EtherscanProviderConfig {
                base_url: DEFAULT_ETHERSCAN_URL.to_string(),
                api_key: None,
            }),
            wallet: None,
        }
    }
}

fn default_chains() -> Vec<ChainInfo> {
    ChainInfo::defaults()
}

fn default_chain() -> String {
    "eth-mainnet".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_gas_interval_secs() -> u64 {
    15
}

fn default_share_base_url() -> String {
    DEFAULT_SHARE_BASE_URL.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_chains")]
    pub chains: Vec<ChainInfo>,
    #[serde(default = "default_chain")]
    pub default_chain: String,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_gas_interval_secs")]
    pub gas_interval_secs: u64,
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            chains: default_chains(),
            default_chain: default_chain(),
            refresh_interval_secs: default_refresh_interval_secs(),
            gas_interval_secs: default_gas_interval_secs(),
            share_base_url: default_share_base_url(),
            data_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("app", "chainport", "chainport")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("app", "chainport", "chainport")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn coingecko_url(&self) -> &str {
        self.providers
            .coingecko
            .as_ref()
            .map_or(DEFAULT_COINGECKO_URL, |p| &p.base_url)
    }

    pub fn ensideas_url(&self) -> &str {
        self.providers
            .ensideas
            .as_ref()
            .map_or(DEFAULT_ENSIDEAS_URL, |p| &p.base_url)
    }
}
