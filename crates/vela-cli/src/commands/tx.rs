//! Transaction commands

use clap::Subcommand;
use vela_primitives::{Token, TokenAmount};
use vela_sdk::watcher::TxStatus;
use vela_sdk::{Account, ContractCallBuilder, ProxyProvider, Transaction, TransferBuilder};

use super::SignerArgs;
use crate::args::parse_arg;
use crate::{config::Config, output::Output, CliError};

/// Transaction subcommands
#[derive(Debug, Subcommand)]
pub enum TxCommand {
    /// Send native tokens to an address
    Transfer {
        /// Recipient address
        #[arg(short, long)]
        to: String,
        /// Amount to send, denominated (e.g. 0.5)
        #[arg(short, long, default_value = "0")]
        value: String,
        /// Data payload (text)
        #[arg(short, long)]
        data: Option<String>,
        /// Gas limit (computed if not specified)
        #[arg(long)]
        gas_limit: Option<u64>,
        /// Wait until the transaction executes
        #[arg(long)]
        wait: bool,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Call a contract endpoint
    Call {
        /// Contract address
        #[arg(short, long)]
        contract: String,
        /// Endpoint name
        #[arg(short, long)]
        function: String,
        /// Arguments as type:value (repeatable)
        #[arg(short, long = "arg")]
        args: Vec<String>,
        /// Amount to send, denominated
        #[arg(short, long, default_value = "0")]
        value: String,
        /// Gas limit (computed if not specified)
        #[arg(long)]
        gas_limit: Option<u64>,
        /// Wait until the transaction executes
        #[arg(long)]
        wait: bool,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Show the status of a transaction
    Status {
        /// Transaction hash
        hash: String,
    },
    /// Wait until a transaction executes
    Wait {
        /// Transaction hash
        hash: String,
    },
}

impl TxCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            TxCommand::Transfer {
                to,
                value,
                data,
                gas_limit,
                wait,
                signer,
            } => {
                let provider = config.provider()?;
                let receiver = config.parse_address(&to)?;
                let (wallet, mut account) = load_sender(&provider, &signer).await?;
                let network = provider.network_config().await?;

                let mut builder = TransferBuilder::new(network, &account, receiver)
                    .value(parse_value(&value)?)
                    .data(data.unwrap_or_default().into_bytes());
                if let Some(limit) = gas_limit {
                    builder = builder.gas_limit(limit);
                }
                let mut tx = builder.build()?;
                account.sign_transaction(&mut tx, &wallet).await?;
                submit(config, &provider, &tx, wait, json).await
            }
            TxCommand::Call {
                contract,
                function,
                args,
                value,
                gas_limit,
                wait,
                signer,
            } => {
                let provider = config.provider()?;
                let contract = config.parse_address(&contract)?;
                let args = args
                    .iter()
                    .map(|a| parse_arg(a))
                    .collect::<Result<Vec<_>, _>>()?;
                let (wallet, mut account) = load_sender(&provider, &signer).await?;
                let network = provider.network_config().await?;

                let mut builder = ContractCallBuilder::new(network, &account, contract, function)
                    .args(args)
                    .value(parse_value(&value)?);
                if let Some(limit) = gas_limit {
                    builder = builder.gas_limit(limit);
                }
                let mut tx = builder.build()?;
                account.sign_transaction(&mut tx, &wallet).await?;
                submit(config, &provider, &tx, wait, json).await
            }
            TxCommand::Status { hash } => {
                let provider = config.provider()?;
                let status = provider.get_transaction_status(&hash).await?;
                let class = match TxStatus::from_status(&status) {
                    TxStatus::Pending => "pending",
                    TxStatus::Success => "success",
                    TxStatus::Failed => "failed",
                    TxStatus::Invalid => "invalid",
                    TxStatus::Unknown(_) => "unknown",
                };
                Output::new(json)
                    .field("hash", &hash)
                    .field("status", &status)
                    .field("class", class)
                    .message(&format!("{}: {}", hash, status))
                    .print();
                Ok(())
            }
            TxCommand::Wait { hash } => {
                let provider = config.provider()?;
                wait_and_print(config, &provider, &hash, json).await
            }
        }
    }
}

/// Open the wallet and fetch its account state
async fn load_sender(
    provider: &ProxyProvider,
    signer: &SignerArgs,
) -> Result<(vela_sdk::Wallet, Account), CliError> {
    let wallet = signer.wallet()?;
    let mut account = Account::new(*wallet.address());
    account.sync_from_network(provider).await?;
    if account.guarded {
        return Err(CliError::InvalidKey(
            "account is guarded; co-signing is not supported from the command line".to_string(),
        ));
    }
    Ok((wallet, account))
}

fn parse_value(value: &str) -> Result<vela_primitives::BigUint, CliError> {
    TokenAmount::from_denominated(Token::native(), value)
        .map(|amount| amount.amount)
        .map_err(|e| CliError::InvalidAmount(e.to_string()))
}

async fn submit(
    config: &Config,
    provider: &ProxyProvider,
    tx: &Transaction,
    wait: bool,
    json: bool,
) -> Result<(), CliError> {
    let hash = provider.send_transaction(tx).await?;
    if wait {
        return wait_and_print(config, provider, &hash, json).await;
    }
    Output::new(json)
        .field("hash", &hash)
        .field_u64("nonce", tx.nonce)
        .field_u64("gas_limit", tx.gas_limit)
        .message(&format!("Transaction sent: {}", hash))
        .print();
    Ok(())
}

async fn wait_and_print(
    config: &Config,
    provider: &ProxyProvider,
    hash: &str,
    json: bool,
) -> Result<(), CliError> {
    let executed = config.watcher(provider).await_executed(hash).await?;
    Output::new(json)
        .field("hash", &executed.hash)
        .field("status", &executed.status)
        .message(&format!("Transaction {} executed: {}", executed.hash, executed.status))
        .print();
    Ok(())
}
