//! Command-line interface
//!
//! Clap-based subcommand layout with one module per command. `Cli::execute`
//! owns process wiring: logging, settings, the file-backed stores, the shared
//! time-series cache, and the account service the commands run against.

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

pub mod commands;

use crate::cache::TimeSeriesCache;
use crate::config::Settings;
use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::ledger::FileStore;
use crate::logging::{init_logging, LogMode, LoggingConfig};
use crate::marketdata::{CachedMarketData, HttpMarketData};
use crate::service::AccountService;

use commands::ask::AskArgs;
use commands::balance::BalanceArgs;
use commands::bars::BarsArgs;
use commands::import::ImportArgs;
use commands::portfolio::PortfolioArgs;
use commands::quote::QuoteArgs;
use commands::trades::TradesArgs;

#[derive(Parser)]
#[command(name = "brokerbot")]
#[command(version)]
#[command(about = "Brokerage account assistant: portfolio, trades, and market data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Account to operate on
    #[arg(long, global = true, default_value = "default")]
    pub account: String,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Emit machine-readable JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the reconstructed portfolio with positions and day change
    Portfolio(PortfolioArgs),

    /// List trades from the account ledger
    Trades(TradesArgs),

    /// Show the latest account balance (or recent history)
    Balance(BalanceArgs),

    /// Fetch the latest quote for a symbol
    Quote(QuoteArgs),

    /// Fetch historical bars for a symbol
    Bars(BarsArgs),

    /// Ask a free-form question about the account
    Ask(AskArgs),

    /// Import trades or balance rows from CSV files
    Import(ImportArgs),
}

/// Wired-up runtime shared by every command
pub struct AppContext {
    pub account_id: String,
    pub service: Arc<AccountService>,
    pub store: FileStore,
    pub json: bool,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        if self.verbose > 0 && std::env::var("RUST_LOG").is_err() {
            let level = if self.verbose > 1 { "trace" } else { "debug" };
            std::env::set_var("RUST_LOG", level);
        }

        let data_paths = DataPaths::new(&self.data_dir);
        data_paths.ensure_directories()?;
        data_paths.ensure_account_directories(&self.account)?;

        // JSON output keeps stdout clean for pipes
        let mode = if self.json {
            LogMode::FileOnly
        } else {
            LogMode::ConsoleAndFile
        };
        init_logging(LoggingConfig::new(mode, data_paths.clone()))?;

        let settings = Settings::from_env();
        let store = FileStore::new(data_paths);
        let cache: Arc<TimeSeriesCache<Value>> = Arc::new(TimeSeriesCache::new());
        let provider = Arc::new(HttpMarketData::new(settings.market_data_url.clone()));
        let market = CachedMarketData::new(provider, cache.clone(), settings.clone());
        tracing::debug!(
            provider = market.provider_name(),
            url = %settings.market_data_url,
            "Market data provider wired"
        );
        let service = Arc::new(AccountService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            market,
            cache,
            settings,
        ));

        let ctx = AppContext {
            account_id: self.account,
            service,
            store,
            json: self.json,
        };

        match self.command {
            Commands::Portfolio(args) => commands::portfolio::execute(args, &ctx).await,
            Commands::Trades(args) => commands::trades::execute(args, &ctx).await,
            Commands::Balance(args) => commands::balance::execute(args, &ctx).await,
            Commands::Quote(args) => commands::quote::execute(args, &ctx).await,
            Commands::Bars(args) => commands::bars::execute(args, &ctx).await,
            Commands::Ask(args) => commands::ask::execute(args, &ctx).await,
            Commands::Import(args) => commands::import::execute(args, &ctx).await,
        }
    }
}
