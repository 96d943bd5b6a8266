//! Subcommands

pub mod account;
pub mod contract;
pub mod network;
pub mod tx;
pub mod wallet;

use std::path::PathBuf;

use clap::Args;
use vela_sdk::Wallet;

use crate::CliError;

/// Where the signing key comes from
#[derive(Debug, Args)]
pub struct SignerArgs {
    /// Keystore file holding the key or mnemonic
    #[arg(long, conflicts_with = "secret_key")]
    pub keystore: Option<PathBuf>,

    /// Keystore password
    #[arg(long, requires = "keystore")]
    pub password: Option<String>,

    /// Account index, for mnemonic keystores
    #[arg(long, default_value = "0")]
    pub index: u32,

    /// Secret key (hex)
    #[arg(long)]
    pub secret_key: Option<String>,
}

impl SignerArgs {
    /// Open the wallet selected by these flags
    pub fn wallet(&self) -> Result<Wallet, CliError> {
        match (&self.keystore, &self.secret_key) {
            (Some(path), _) => {
                let password = self.password.as_deref().unwrap_or_default();
                Ok(Wallet::from_keystore(path, password, self.index)?)
            }
            (None, Some(key)) => Wallet::from_secret_key_hex(key)
                .map_err(|e| CliError::InvalidKey(e.to_string())),
            (None, None) => Err(CliError::InvalidKey(
                "pass --keystore or --secret-key".to_string(),
            )),
        }
    }
}
