pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use anyhow::Result;
use crate::cli::AppContext;
use crate::cli::view::ViewTarget;
use crate::core::config::AppConfig;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A command run against the configured providers and state.
#[derive(Debug, Clone)]
pub enum AppCommand {
    View {
        target: ViewTarget,
        search: Option<String>,
    },
    Connect {
        chain: Option<String>,
    },
    Watch {
        target: ViewTarget,
        search: Option<String>,
    },
    Export {
        target: ViewTarget,
        output: PathBuf,
    },
    History,
    Chain {
        key: Option<String>,
    },
    Share,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => {
            let path = AppConfig::default_config_path()?;
            if path.exists() {
                AppConfig::load()
            } else {
                warn!(
                    "No configuration at {}, using defaults. Run `chainport setup` to create one.",
                    path.display()
                );
                Ok(AppConfig::default())
            }
        }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ChainPort starting...");
    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    let search = match &command {
        AppCommand::View { search, .. } | AppCommand::Watch { search, .. } => search.clone(),
        _ => None,
    };
    let ctx = AppContext::build(config, search).await?;

    match command {
        AppCommand::View { target, .. } => cli::view::run(&ctx, &target).await,
        AppCommand::Connect { chain } => cli::view::connect(&ctx, chain.as_deref()).await,
        AppCommand::Watch { target, .. } => cli::view::watch(&ctx, &target).await,
        AppCommand::Export { target, output } => cli::export::run(&ctx, &target, &output).await,
        AppCommand::History => cli::history::run(&ctx).await,
        AppCommand::Chain { key } => cli::chain::run(&ctx, key.as_deref()).await,
        AppCommand::Share => cli::chain::share(&ctx).await,
    }
}
