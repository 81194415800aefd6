//! Core business logic abstractions

pub mod balance;
pub mod cache;
pub mod chain;
pub mod clock;
pub mod config;
pub mod controller;
pub mod export;
pub mod history;
pub mod holding;
pub mod link;
pub mod log;
pub mod network;
pub mod presenter;
pub mod price;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod valuation;
pub mod wallet;

// Re-export main types for cleaner imports
pub use balance::BalanceProvider;
pub use controller::{LoadOutcome, PortfolioController, Providers};
pub use holding::TokenHolding;
pub use network::{GasOracle, NameResolver};
pub use presenter::{PortfolioView, Presenter};
pub use price::{PriceProvider, SparklineProvider};
pub use state::StateStore;
pub use valuation::{Valuation, valuate};
pub use wallet::WalletProvider;
