//! Contract commands

use clap::Subcommand;
use vela_sdk::contract::{EndpointDefinition, SmartContract};

use crate::args::{parse_arg, parse_type};
use crate::output::value_to_json;
use crate::{config::Config, output::Output, CliError};

/// Contract subcommands
#[derive(Debug, Subcommand)]
pub enum ContractCommand {
    /// Run a read-only query
    Query {
        /// Contract address
        #[arg(short, long)]
        contract: String,
        /// Endpoint name
        #[arg(short, long)]
        function: String,
        /// Arguments as type:value (repeatable)
        #[arg(short, long = "arg")]
        args: Vec<String>,
        /// Result types, in order (repeatable); raw buffers are shown when omitted
        #[arg(short, long = "output")]
        outputs: Vec<String>,
        /// Caller address seen by the contract
        #[arg(long)]
        caller: Option<String>,
    },
}

impl ContractCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            ContractCommand::Query {
                contract,
                function,
                args,
                outputs,
                caller,
            } => {
                let address = config.parse_address(&contract)?;
                let args = args
                    .iter()
                    .map(|a| parse_arg(a))
                    .collect::<Result<Vec<_>, _>>()?;
                let outputs = outputs
                    .iter()
                    .map(|t| parse_type(t))
                    .collect::<Result<Vec<_>, _>>()?;
                let caller = caller.map(|c| config.parse_address(&c)).transpose()?;

                let inputs = args.iter().map(|a| a.type_value()).collect();
                let contract = SmartContract::new(address).with_endpoint(EndpointDefinition::new(
                    function.clone(),
                    inputs,
                    outputs.clone(),
                ));
                let provider = config.provider()?;
                let response = contract.query_raw(&provider, &function, &args, caller).await?;

                let result = if outputs.is_empty() {
                    let buffers = response.buffers()?;
                    serde_json::Value::Array(
                        buffers
                            .iter()
                            .map(|b| serde_json::Value::String(hex::encode(b)))
                            .collect(),
                    )
                } else {
                    let value = vela_sdk::abi::ResultsParser::new()
                        .parse_base64(&response.return_data, &outputs)?;
                    value_to_json(&value)
                };

                Output::new(json)
                    .field("function", &function)
                    .field_value("result", result.clone())
                    .field_u64("gas_remaining", response.gas_remaining)
                    .message(&serde_json::to_string_pretty(&result)?)
                    .print();
                Ok(())
            }
        }
    }
}
