//! Network commands

use clap::Subcommand;

use crate::{config::Config, output::Output, CliError};

/// Network subcommands
#[derive(Debug, Subcommand)]
pub enum NetworkCommand {
    /// Show the network configuration
    Config,
}

impl NetworkCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            NetworkCommand::Config => {
                let provider = config.provider()?;
                let network = provider.network_config().await?;
                Output::new(json)
                    .field("chain_id", &network.chain_id)
                    .field_u64("min_gas_price", network.min_gas_price)
                    .field_u64("min_gas_limit", network.min_gas_limit)
                    .field_u64("gas_per_data_byte", network.gas_per_data_byte)
                    .field("gas_price_modifier", &network.gas_price_modifier.to_string())
                    .field_u64(
                        "min_transaction_version",
                        u64::from(network.min_transaction_version),
                    )
                    .message(&format!(
                        "Chain ID:          {}\nMin gas price:     {}\nMin gas limit:     {}\nGas per data byte: {}\nGas price modifier: {}",
                        network.chain_id,
                        network.min_gas_price,
                        network.min_gas_limit,
                        network.gas_per_data_byte,
                        network.gas_price_modifier
                    ))
                    .print();
                Ok(())
            }
        }
    }
}
