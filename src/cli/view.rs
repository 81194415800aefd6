use super::AppContext;
use crate::core::link::LinkParams;
use crate::core::presenter::Presenter;
use crate::core::scheduler::PeriodicTask;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

const NOTHING_TO_VIEW: &str =
    "No address to view. Pass --address, open a share link with --link, or run `chainport connect`.";

/// Which address and chain to open. Explicit flags override the link.
#[derive(Debug, Clone, Default)]
pub struct ViewTarget {
    pub address: Option<String>,
    pub chain: Option<String>,
    pub link: Option<String>,
}

impl ViewTarget {
    pub fn link_params(&self) -> Result<LinkParams> {
        let mut params = match &self.link {
            Some(link) => LinkParams::parse(link)?,
            None => LinkParams::default(),
        };
        if let Some(address) = self.address.as_deref().filter(|a| !a.is_empty()) {
            params.address = Some(address.to_string());
        }
        if let Some(chain) = self.chain.as_deref().filter(|c| !c.is_empty()) {
            params.chain = Some(chain.to_string());
        }
        Ok(params)
    }
}

/// Loads and renders the target once.
pub async fn run(ctx: &AppContext, target: &ViewTarget) -> Result<()> {
    let params = target.link_params()?;
    if ctx.controller.boot(&params).await.is_none() {
        ctx.presenter.show_notice(NOTHING_TO_VIEW);
    }
    ctx.show_gas_price().await;
    Ok(())
}

/// Loads the first account exposed by the configured wallet.
pub async fn connect(ctx: &AppContext, chain: Option<&str>) -> Result<()> {
    match chain {
        Some(key) => {
            ctx.controller.select_chain(key).await;
        }
        None => {
            ctx.controller.restore(&LinkParams::default()).await;
        }
    }
    ctx.controller.connect_wallet().await;
    ctx.show_gas_price().await;
    Ok(())
}

/// Keeps the target on screen, refreshing the portfolio and the gas price
/// until interrupted.
pub async fn watch(ctx: &AppContext, target: &ViewTarget) -> Result<()> {
    let params = target.link_params()?;
    if ctx.controller.boot(&params).await.is_none() {
        ctx.presenter.show_notice(NOTHING_TO_VIEW);
        return Ok(());
    }
    ctx.show_gas_price().await;

    let refresh_every = Duration::from_secs(ctx.config.refresh_interval_secs.max(1));
    ctx.controller.start_auto_refresh(refresh_every);

    let gas_task = ctx.gas.clone().map(|gas| {
        let presenter = ctx.presenter.clone();
        let gas_every = Duration::from_secs(ctx.config.gas_interval_secs.max(1));
        PeriodicTask::spawn("gas-price", gas_every, move || {
            let gas = gas.clone();
            let presenter = presenter.clone();
            async move {
                let gwei = gas.proposed_gas_price().await;
                presenter.show_gas_price(gwei.as_deref());
            }
        })
    });

    info!(?refresh_every, "Watching portfolio, press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    ctx.controller.stop_auto_refresh();
    drop(gas_task);
    info!("Stopped watching");
    Ok(())
}
