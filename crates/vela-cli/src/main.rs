//! # vela-cli
//!
//! Command-line interface for the vela ledger SDK.
//!
//! ## Usage
//!
//! ```bash
//! # Wallet commands
//! vela wallet new
//! vela wallet derive --mnemonic "..." --index 1
//! vela wallet keystore-new --password secret --output alice.json
//! vela wallet sign-message "hello" --keystore alice.json --password secret
//!
//! # State
//! vela account show erd1...
//! vela network config
//!
//! # Transactions
//! vela tx transfer --to erd1... --value 0.5 --keystore alice.json --password secret --wait
//! vela tx call --contract erd1... --function add --arg u32:10 --secret-key ...
//! vela tx wait <hash>
//!
//! # Queries
//! vela contract query --contract erd1... --function getSum --output biguint
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod args;
mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// vela CLI
#[derive(Parser, Debug)]
#[command(name = "vela")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Gateway endpoint URL
    #[arg(long, global = true)]
    proxy_url: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Mnemonics, keystores and message signatures
    #[command(subcommand)]
    Wallet(commands::wallet::WalletCommand),
    /// Account state
    #[command(subcommand)]
    Account(commands::account::AccountCommand),
    /// Network parameters
    #[command(subcommand)]
    Network(commands::network::NetworkCommand),
    /// Transaction operations
    #[command(subcommand)]
    Tx(commands::tx::TxCommand),
    /// Smart-contract queries
    #[command(subcommand)]
    Contract(commands::contract::ContractCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set gateway URL
        #[arg(long)]
        set_proxy: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so --json output stays machine-readable
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = Config::load();
    if let Some(proxy_url) = cli.proxy_url {
        config.proxy_url = proxy_url;
    }
    tracing::debug!(proxy_url = %config.proxy_url, "configuration loaded");

    let result = match cli.command {
        Commands::Wallet(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Account(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Network(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Tx(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Contract(cmd) => cmd.execute(&config, cli.json).await,
        Commands::Config { show, set_proxy } => handle_config(&mut config, show, set_proxy, cli.json),
    };

    if let Err(e) = result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
    Ok(())
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_proxy: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    if let Some(proxy) = set_proxy {
        config.proxy_url = proxy;
        let path = config.save()?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.display().to_string())
            .message("Configuration saved")
            .print();
    } else if show {
        let keystore_dir = config
            .keystore_dir()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        Output::new(json)
            .field("proxy_url", &config.proxy_url)
            .field("hrp", &config.hrp)
            .field("api_flavor", &config.api_flavor)
            .field_u64("poll_interval_ms", config.poll_interval_ms)
            .field_u64("timeout_secs", config.timeout_secs)
            .field("keystore_dir", &keystore_dir)
            .message(&format!(
                "Proxy URL:     {}\nHRP:           {}\nAPI flavor:    {}\nPoll interval: {} ms\nTimeout:       {} s\nKeystore dir:  {}",
                config.proxy_url,
                config.hrp,
                config.api_flavor,
                config.poll_interval_ms,
                config.timeout_secs,
                keystore_dir
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-proxy to modify")
            .print();
    }

    Ok(())
}
