use anyhow::Result;
use chainport::cli::setup::setup;
use chainport::cli::view::ViewTarget;
use chainport::core::log::init_logging;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
struct TargetArgs {
    /// Wallet address to view, defaults to the last one viewed
    #[arg(short, long)]
    address: Option<String>,

    /// Chain key, e.g. eth-mainnet
    #[arg(long)]
    chain: Option<String>,

    /// Share link carrying `address` and `chain` query parameters
    #[arg(short, long)]
    link: Option<String>,
}

impl From<TargetArgs> for ViewTarget {
    fn from(args: TargetArgs) -> Self {
        ViewTarget {
            address: args.address,
            chain: args.chain,
            link: args.link,
        }
    }
}

impl From<Commands> for chainport::AppCommand {
    fn from(cmd: Commands) -> chainport::AppCommand {
        match cmd {
            Commands::View { target, search } => chainport::AppCommand::View {
                target: target.into(),
                search,
            },
            Commands::Connect { chain } => chainport::AppCommand::Connect { chain },
            Commands::Watch { target, search } => chainport::AppCommand::Watch {
                target: target.into(),
                search,
            },
            Commands::Export { target, output } => chainport::AppCommand::Export {
                target: target.into(),
                output,
            },
            Commands::History => chainport::AppCommand::History,
            Commands::Chain { key } => chainport::AppCommand::Chain { key },
            Commands::Share => chainport::AppCommand::Share,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the token holdings of an address
    View {
        #[command(flatten)]
        target: TargetArgs,

        /// Only show tokens whose symbol contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Load the account of the configured wallet
    Connect {
        /// Chain to switch to before connecting
        #[arg(long)]
        chain: Option<String>,
    },
    /// Keep refreshing the portfolio and gas price until interrupted
    Watch {
        #[command(flatten)]
        target: TargetArgs,

        /// Only show tokens whose symbol contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Export the holdings as CSV
    Export {
        #[command(flatten)]
        target: TargetArgs,

        /// Directory to write the file into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Display the recorded portfolio value history
    History,
    /// List chains, or switch chain and reload the last address
    Chain {
        /// Chain key to switch to
        key: Option<String>,
    },
    /// Print a read-only link to the last viewed portfolio
    Share,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => chainport::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
