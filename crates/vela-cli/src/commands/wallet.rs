//! Wallet commands: mnemonics, keystores and message signatures

use std::path::{Path, PathBuf};

use clap::Subcommand;
use vela_crypto::keystore::KeystoreKind;
use vela_crypto::{address_to_public_key, verify_message, KeystoreFile, Signature};
use vela_sdk::Wallet;

use super::SignerArgs;
use crate::{config::Config, output::Output, CliError};

/// Wallet subcommands
#[derive(Debug, Subcommand)]
pub enum WalletCommand {
    /// Generate a new mnemonic and show its first address
    New,
    /// Derive an address from a mnemonic
    Derive {
        /// Mnemonic phrase
        #[arg(short, long)]
        mnemonic: String,
        /// Account index
        #[arg(short, long, default_value = "0")]
        index: u32,
    },
    /// Write an encrypted keystore file
    KeystoreNew {
        /// Output file path (defaults to the keystore directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Password for keystore encryption
        #[arg(short, long)]
        password: String,
        /// Store this mnemonic instead of generating a key
        #[arg(long, conflicts_with = "secret_key")]
        mnemonic: Option<String>,
        /// Store this secret key (hex) instead of generating one
        #[arg(long)]
        secret_key: Option<String>,
    },
    /// Decrypt a keystore file and show its address
    KeystoreDecrypt {
        /// Path to keystore file
        path: PathBuf,
        /// Keystore password
        #[arg(short, long)]
        password: String,
        /// Account index, for mnemonic keystores
        #[arg(short, long, default_value = "0")]
        index: u32,
    },
    /// Sign an off-chain message
    SignMessage {
        /// Message text
        message: String,
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Verify an off-chain message signature
    VerifyMessage {
        /// Message text
        message: String,
        /// Signer address
        #[arg(short, long)]
        address: String,
        /// Signature (hex)
        #[arg(short, long)]
        signature: String,
    },
}

impl WalletCommand {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        match self {
            WalletCommand::New => new_wallet(config, json),
            WalletCommand::Derive { mnemonic, index } => derive(config, &mnemonic, index, json),
            WalletCommand::KeystoreNew {
                output,
                password,
                mnemonic,
                secret_key,
            } => keystore_new(config, output, &password, mnemonic, secret_key, json),
            WalletCommand::KeystoreDecrypt {
                path,
                password,
                index,
            } => keystore_decrypt(config, &path, &password, index, json),
            WalletCommand::SignMessage { message, signer } => {
                let wallet = signer.wallet()?;
                let signature = wallet.sign_message(message.as_bytes());
                Output::new(json)
                    .field("address", &config.format_address(wallet.address())?)
                    .field("signature", &signature)
                    .message(&signature)
                    .print();
                Ok(())
            }
            WalletCommand::VerifyMessage {
                message,
                address,
                signature,
            } => {
                let address = config.parse_address(&address)?;
                let public_key = address_to_public_key(&address)?;
                let signature = Signature::from_hex(&signature)?;
                let valid = verify_message(message.as_bytes(), &signature, &public_key);
                Output::new(json)
                    .field_bool("valid", valid)
                    .message(if valid {
                        "Signature is valid"
                    } else {
                        "Signature is NOT valid"
                    })
                    .print();
                if valid {
                    Ok(())
                } else {
                    Err(CliError::InvalidArgument("signature does not match".to_string()))
                }
            }
        }
    }
}

fn new_wallet(config: &Config, json: bool) -> Result<(), CliError> {
    let (wallet, mnemonic) = Wallet::generate()?;
    let address = config.format_address(wallet.address())?;

    Output::new(json)
        .field("mnemonic", &mnemonic)
        .field("address", &address)
        .message(&format!("Mnemonic: {}\nAddress:  {}", mnemonic, address))
        .print();

    if !json {
        eprintln!("\nWARNING: Write the mnemonic down. It is the only way to recover the account.");
    }
    Ok(())
}

fn derive(config: &Config, mnemonic: &str, index: u32, json: bool) -> Result<(), CliError> {
    let wallet = Wallet::from_mnemonic(mnemonic, index)?;
    let address = config.format_address(wallet.address())?;

    Output::new(json)
        .field("address", &address)
        .field_u64("index", u64::from(index))
        .message(&address)
        .print();
    Ok(())
}

fn keystore_new(
    config: &Config,
    output: Option<PathBuf>,
    password: &str,
    mnemonic: Option<String>,
    secret_key: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let keystore = match (mnemonic, secret_key) {
        (Some(mnemonic), _) => {
            // validates the phrase before it gets encrypted
            Wallet::from_mnemonic(&mnemonic, 0)?;
            KeystoreFile::encrypt_mnemonic(&mnemonic, password)?
        }
        (None, Some(key)) => Wallet::from_secret_key_hex(&key)
            .map_err(|e| CliError::InvalidKey(e.to_string()))?
            .to_keystore(password)?,
        (None, None) => Wallet::generate()?.0.to_keystore(password)?,
    };

    let path = match output {
        Some(path) => path,
        None => {
            let dir = config
                .keystore_dir()
                .ok_or_else(|| CliError::Config("no keystore directory".to_string()))?;
            dir.join(format!("{}.json", keystore.id))
        }
    };
    keystore.save(&path)?;

    let address = match keystore.address() {
        Some(address) => config.format_address(&address)?,
        None => String::new(),
    };
    Output::new(json)
        .field("path", &path.display().to_string())
        .field(
            "kind",
            match keystore.kind {
                KeystoreKind::SecretKey => "secretKey",
                KeystoreKind::Mnemonic => "mnemonic",
            },
        )
        .field("address", &address)
        .message(&format!("Keystore written to {}", path.display()))
        .print();
    Ok(())
}

fn keystore_decrypt(
    config: &Config,
    path: &Path,
    password: &str,
    index: u32,
    json: bool,
) -> Result<(), CliError> {
    let wallet = Wallet::from_keystore(path, password, index)?;
    let address = config.format_address(wallet.address())?;

    Output::new(json)
        .field("address", &address)
        .message(&format!("Address: {}", address))
        .print();
    Ok(())
}
