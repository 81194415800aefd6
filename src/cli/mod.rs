pub mod chain;
pub mod export;
pub mod history;
pub mod presenter;
pub mod setup;
pub mod ui;
pub mod view;

use crate::core::cache::Cache;
use crate::core::clock::SystemClock;
use crate::core::config::{AppConfig, DEFAULT_COVALENT_URL};
use crate::core::controller::{PortfolioController, Providers};
use crate::core::network::{GasOracle, NameResolver};
use crate::core::presenter::Presenter;
use crate::core::wallet::WalletProvider;
use crate::providers::{
    coingecko::CoinGeckoProvider, covalent::CovalentProvider, ensideas::EnsIdeasResolver,
    etherscan::EtherscanGasOracle, json_rpc_wallet::JsonRpcWallet,
};
use crate::store::open_state_store;
use anyhow::Result;
use presenter::TerminalPresenter;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const SPARKLINE_TTL: Duration = Duration::from_secs(600);

/// Everything a command needs, wired from the configuration.
pub struct AppContext {
    pub config: AppConfig,
    pub controller: Arc<PortfolioController>,
    pub gas: Option<Arc<dyn GasOracle>>,
    pub presenter: Arc<TerminalPresenter>,
}

impl AppContext {
    pub async fn build(config: AppConfig, search: Option<String>) -> Result<Self> {
        let coingecko = Arc::new(CoinGeckoProvider::new(
            config.coingecko_url(),
            Arc::new(Cache::new(SPARKLINE_TTL)),
        )?);

        let (covalent_url, covalent_key) = config
            .providers
            .covalent
            .as_ref()
            .map_or((DEFAULT_COVALENT_URL, ""), |p| {
                (p.base_url.as_str(), p.api_key.as_str())
            });
        if covalent_key.is_empty() {
            warn!("No Covalent API key configured, balance requests will likely be rejected");
        }
        let balances = Arc::new(CovalentProvider::new(covalent_url, covalent_key)?);

        let names: Arc<dyn NameResolver> = Arc::new(EnsIdeasResolver::new(config.ensideas_url())?);
        let gas: Option<Arc<dyn GasOracle>> = match &config.providers.etherscan {
            Some(p) => Some(Arc::new(EtherscanGasOracle::new(
                &p.base_url,
                p.api_key.as_deref(),
            )?)),
            None => None,
        };
        let wallet: Option<Arc<dyn WalletProvider>> = match &config.providers.wallet {
            Some(p) => Some(Arc::new(JsonRpcWallet::new(&p.rpc_url)?)),
            None => None,
        };

        let presenter = Arc::new(TerminalPresenter::new(search));
        let providers = Providers {
            prices: coingecko.clone(),
            balances,
            sparklines: Some(coingecko),
            names: Some(names),
            wallet,
        };
        let controller = PortfolioController::new(
            providers,
            open_state_store(&config),
            presenter.clone(),
            Arc::new(SystemClock),
            config.chains.clone(),
            &config.default_chain,
        )
        .await;

        Ok(Self {
            config,
            controller: Arc::new(controller),
            gas,
            presenter,
        })
    }

    pub async fn show_gas_price(&self) {
        if let Some(gas) = &self.gas {
            let gwei = gas.proposed_gas_price().await;
            self.presenter.show_gas_price(gwei.as_deref());
        }
    }
}
