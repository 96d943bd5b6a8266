//! Account commands

use clap::Subcommand;
use vela_sdk::Account;

use crate::{config::Config, output::Output, CliError};

/// Account subcommands
#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Show nonce, balance and guardian state of an address
    Show {
        /// Address to query (bech32)
        address: String,
    },
}

impl AccountCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            AccountCommand::Show { address } => show_account(config, &address, json).await,
        }
    }
}

async fn show_account(config: &Config, address: &str, json: bool) -> Result<(), CliError> {
    let address = config.parse_address(address)?;
    let provider = config.provider()?;

    let mut account = Account::new(address);
    account.sync_from_network(&provider).await?;

    let guardian = match &account.guardian {
        Some(guardian) => config.format_address(guardian)?,
        None => String::new(),
    };
    let balance = account.balance.to_denominated();

    Output::new(json)
        .field("address", &config.format_address(&account.address)?)
        .field_u64("nonce", account.nonce)
        .field("balance", &account.balance.amount.to_string())
        .field("balance_denominated", &balance)
        .field_bool("guarded", account.guarded)
        .field("guardian", &guardian)
        .message(&format!(
            "Nonce:   {}\nBalance: {} {}\nGuarded: {}",
            account.nonce, balance, account.balance.token.identifier, account.guarded
        ))
        .print();
    Ok(())
}
