//! Orchestrates fetch, valuation, history, rendering and persistence.
use crate::core::balance::BalanceProvider;
use crate::core::chain::{ChainInfo, ChainSelection};
use crate::core::clock::Clock;
use crate::core::export;
use crate::core::history::{HistoryLog, HistoryTracker};
use crate::core::link::{self, LinkParams};
use crate::core::network::NameResolver;
use crate::core::presenter::{PortfolioView, Presenter};
use crate::core::price::{PriceProvider, SparklineProvider};
use crate::core::scheduler::PeriodicTask;
use crate::core::session::ViewState;
use crate::core::state::{LAST_ADDRESS_KEY, LAST_CHAIN_KEY, StateStore};
use crate::core::valuation::{Valuation, valuate};
use crate::core::wallet::WalletProvider;
use anyhow::Result;
use futures::future::join_all;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data";
pub const NO_WALLET_MESSAGE: &str =
    "No wallet provider configured. Set providers.wallet.rpc_url to connect a wallet.";

/// External collaborators the controller talks to. Only prices and balances
/// are required.
#[derive(Clone)]
pub struct Providers {
    pub prices: Arc<dyn PriceProvider>,
    pub balances: Arc<dyn BalanceProvider>,
    pub sparklines: Option<Arc<dyn SparklineProvider>>,
    pub names: Option<Arc<dyn NameResolver>>,
    pub wallet: Option<Arc<dyn WalletProvider>>,
}

/// How a single portfolio load ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded { total: f64 },
    /// A newer load was applied first; these results were dropped.
    Stale,
    /// Balances could not be fetched; the previous view is untouched.
    Failed,
}

pub struct PortfolioController {
    providers: Providers,
    store: Arc<dyn StateStore>,
    presenter: Arc<dyn Presenter>,
    clock: Arc<dyn Clock>,
    default_chain: String,
    state: Mutex<ViewState>,
    history: Mutex<HistoryTracker>,
    auto_refresh: StdMutex<Option<PeriodicTask>>,
}

impl PortfolioController {
    pub async fn new(
        providers: Providers,
        store: Arc<dyn StateStore>,
        presenter: Arc<dyn Presenter>,
        clock: Arc<dyn Clock>,
        chains: Vec<ChainInfo>,
        default_chain: &str,
    ) -> Self {
        let history = HistoryTracker::load(Arc::clone(&store)).await;
        let (chain, _) = ChainSelection::initial(chains, None, None, default_chain);
        Self {
            providers,
            store,
            presenter,
            clock,
            default_chain: default_chain.to_string(),
            state: Mutex::new(ViewState::new(chain)),
            history: Mutex::new(history),
            auto_refresh: StdMutex::new(None),
        }
    }

    /// Restores the initial view without loading it: chain from the link,
    /// else the last chain used, else the default; address from the link,
    /// else the last address viewed.
    pub async fn restore(&self, link: &LinkParams) -> Option<String> {
        let persisted_chain = self.store.get(LAST_CHAIN_KEY).await;
        let address = match &link.address {
            Some(address) => Some(address.clone()),
            None => self.store.get(LAST_ADDRESS_KEY).await,
        };

        let mut state = self.state.lock().await;
        let (selection, origin) = ChainSelection::initial(
            state.chain.available().to_vec(),
            link.chain.as_deref(),
            persisted_chain.as_deref(),
            &self.default_chain,
        );
        debug!(chain = %selection.current(), ?origin, "Initial chain selected");
        state.chain = selection;
        state.address = address.clone();
        address
    }

    /// Restores the initial view and loads it when an address is known.
    pub async fn boot(&self, link: &LinkParams) -> Option<LoadOutcome> {
        match self.restore(link).await {
            Some(address) => {
                let chain_key = self.current_chain().await.key;
                Some(self.load_portfolio(&address, &chain_key).await)
            }
            None => {
                debug!("No address to restore");
                None
            }
        }
    }

    /// Fetches, values and renders the portfolio of `address` on `chain`.
    ///
    /// Fetch failures are reported through the presenter and never returned
    /// as errors. When loads overlap, results of a load that completes after
    /// a newer one has been applied are discarded.
    #[instrument(name = "LoadPortfolio", skip(self), fields(seq = tracing::field::Empty))]
    pub async fn load_portfolio(&self, address: &str, chain: &str) -> LoadOutcome {
        let (seq, chain, price_ids) = {
            let mut state = self.state.lock().await;
            let seq = state.begin_load();
            let chain = state.chain.select(chain).clone();
            state.address = Some(address.to_string());
            (seq, chain, state.chain.price_ids())
        };
        tracing::Span::current().record("seq", seq);
        self.presenter.show_loading(address, &chain);

        let (prices, balances) = tokio::join!(
            self.providers.prices.fetch_usd_prices(&price_ids),
            self.providers.balances.fetch_balances(address, &chain.key),
        );

        let native_price = match prices {
            Ok(prices) => {
                let price = prices.get(&chain.native_price_id).copied();
                if price.is_none() {
                    warn!(id = %chain.native_price_id, "Native asset price missing from response");
                }
                price
            }
            Err(e) => {
                error!(error = ?e, "Failed to fetch native asset price");
                None
            }
        };

        let holdings = match balances {
            Ok(holdings) => holdings,
            Err(e) => {
                error!(error = ?e, "Failed to fetch balances");
                if self.state.lock().await.is_superseded(seq) {
                    info!("Dropping failure of a superseded load");
                    return LoadOutcome::Stale;
                }
                self.presenter.show_failure(LOAD_FAILED_MESSAGE);
                return LoadOutcome::Failed;
            }
        };

        let valuation = valuate(&holdings, &chain.native_symbol, native_price);
        let (sparklines, ens_name) =
            tokio::join!(self.fetch_sparklines(&valuation), self.resolve_name(address));

        let mut state = self.state.lock().await;
        if !state.try_apply(seq) {
            info!("Discarding results of a superseded load");
            return LoadOutcome::Stale;
        }
        state.native_price = native_price;
        state.valuation = Some(valuation.clone());
        state.loaded_for = Some((address.to_string(), chain.key.clone()));

        let now = self.clock.now();
        let mut history = self.history.lock().await;
        if let Err(e) = history.append(valuation.total, now).await {
            warn!(error = ?e, "History snapshot was not persisted");
        }
        let performance = history.log().performance(now);

        self.presenter.render_portfolio(&PortfolioView {
            address,
            chain: &chain,
            native_price,
            valuation: &valuation,
            sparklines: &sparklines,
            ens_name: ens_name.as_deref(),
            performance,
        });
        self.presenter.render_history(history.log(), performance);
        drop(history);
        drop(state);

        self.save_last_viewed(address, &chain.key).await;
        info!(total = valuation.total, tokens = valuation.tokens.len(), "Portfolio loaded");
        LoadOutcome::Loaded {
            total: valuation.total,
        }
    }

    /// Switches chain and reloads the viewed address, if there is one.
    pub async fn select_chain(&self, key: &str) -> Option<LoadOutcome> {
        let (chain_key, address) = {
            let mut state = self.state.lock().await;
            let chain_key = state.chain.select(key).key.clone();
            (chain_key, state.address.clone())
        };
        if let Err(e) = self.store.set(LAST_CHAIN_KEY, &chain_key).await {
            warn!(error = ?e, "Failed to remember chain selection");
        }

        match address {
            Some(address) => Some(self.load_portfolio(&address, &chain_key).await),
            None => None,
        }
    }

    /// Asks the wallet for its accounts and loads the first one.
    pub async fn connect_wallet(&self) -> Option<LoadOutcome> {
        let Some(wallet) = &self.providers.wallet else {
            self.presenter.show_notice(NO_WALLET_MESSAGE);
            return None;
        };

        let accounts = match wallet.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                error!(error = ?e, "Wallet connection error");
                self.presenter.show_failure("Wallet connection failed");
                return None;
            }
        };
        let Some(address) = accounts.into_iter().next() else {
            self.presenter.show_notice("The wallet did not expose any account.");
            return None;
        };
        info!(address = %address, "Wallet connected");

        let chain_key = self.current_chain().await.key;
        Some(self.load_portfolio(&address, &chain_key).await)
    }

    /// Reloads the viewed address on the current chain.
    pub async fn refresh(&self) -> Option<LoadOutcome> {
        let (address, chain_key) = {
            let state = self.state.lock().await;
            (state.address.clone(), state.chain.current().key.clone())
        };
        match address {
            Some(address) => Some(self.load_portfolio(&address, &chain_key).await),
            None => None,
        }
    }

    /// Refreshes every `period` while an address is viewed. Calling this
    /// again replaces the running timer instead of adding a second one.
    pub fn start_auto_refresh(self: &Arc<Self>, period: Duration) {
        let controller = Arc::downgrade(self);
        let task = PeriodicTask::spawn("auto-refresh", period, move || {
            let controller = controller.clone();
            async move {
                if let Some(controller) = controller.upgrade() {
                    controller.refresh().await;
                }
            }
        });

        let mut slot = self
            .auto_refresh
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = slot.replace(task) {
            previous.cancel();
        }
    }

    pub fn stop_auto_refresh(&self) {
        let mut slot = self
            .auto_refresh
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.take();
    }

    pub fn auto_refresh_active(&self) -> bool {
        let slot = self
            .auto_refresh
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Writes the last loaded holdings as CSV into `dir`, labelled with the
    /// address and chain they were fetched for.
    pub async fn export_csv(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let state = self.state.lock().await;
        let (Some(valuation), Some((address, chain))) = (
            state.valuation.as_ref().filter(|v| !v.tokens.is_empty()),
            state.loaded_for.as_ref(),
        ) else {
            self.presenter.show_notice("No tokens to export.");
            return Ok(None);
        };
        let path = export::write_csv(dir, &valuation.tokens, Some(address.as_str()), chain)?;
        Ok(Some(path))
    }

    /// Link that reopens the current view read-only.
    pub async fn share_link(&self, base: &str) -> Result<Option<Url>> {
        let state = self.state.lock().await;
        let Some(address) = state.address.as_deref() else {
            self.presenter.show_notice("No address to share.");
            return Ok(None);
        };
        link::share_link(base, address, &state.chain.current().key).map(Some)
    }

    pub async fn show_history(&self) {
        let history = self.history.lock().await;
        let performance = history.log().performance(self.clock.now());
        self.presenter.render_history(history.log(), performance);
    }

    pub async fn current_chain(&self) -> ChainInfo {
        self.state.lock().await.chain.current().clone()
    }

    pub async fn viewed_address(&self) -> Option<String> {
        self.state.lock().await.address.clone()
    }

    pub async fn valuation(&self) -> Option<Valuation> {
        self.state.lock().await.valuation.clone()
    }

    pub async fn history(&self) -> HistoryLog {
        self.history.lock().await.log().clone()
    }

    async fn save_last_viewed(&self, address: &str, chain: &str) {
        if let Err(e) = self.store.set(LAST_ADDRESS_KEY, address).await {
            warn!(error = ?e, "Failed to remember last address");
        }
        if let Err(e) = self.store.set(LAST_CHAIN_KEY, chain).await {
            warn!(error = ?e, "Failed to remember last chain");
        }
    }

    async fn fetch_sparklines(&self, valuation: &Valuation) -> HashMap<String, Vec<f64>> {
        let Some(provider) = &self.providers.sparklines else {
            return HashMap::new();
        };

        let mut symbols: Vec<&str> = valuation
            .tokens
            .iter()
            .map(|t| t.holding.symbol.as_str())
            .collect();
        symbols.sort_unstable();
        symbols.dedup();

        let futures = symbols.into_iter().map(|symbol| async move {
            match provider.fetch_sparkline(symbol).await {
                Ok(Some(prices)) if !prices.is_empty() => Some((symbol.to_string(), prices)),
                Ok(_) => None,
                Err(e) => {
                    debug!(symbol, error = %e, "Sparkline unavailable");
                    None
                }
            }
        });
        join_all(futures).await.into_iter().flatten().collect()
    }

    async fn resolve_name(&self, address: &str) -> Option<String> {
        match &self.providers.names {
            Some(names) => names.resolve_name(address).await,
            None => None,
        }
    }
}
