//! CLI configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use vela_sdk::{Address, ApiFlavor, ProxyProvider, TransactionWatcher};

use crate::CliError;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Gateway or API endpoint URL
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    /// Address prefix
    #[serde(default = "default_hrp")]
    pub hrp: String,
    /// `proxy` or `api`
    #[serde(default = "default_api_flavor")]
    pub api_flavor: String,
    /// Delay between status reads when waiting for a transaction
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Time allowed for a transaction to execute
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Keystore directory path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keystore_dir: Option<PathBuf>,
}

fn default_proxy_url() -> String {
    "https://devnet-gateway.multiversx.com".to_string()
}

fn default_hrp() -> String {
    vela_primitives::DEFAULT_HRP.to_string()
}

fn default_api_flavor() -> String {
    "proxy".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            hrp: default_hrp(),
            api_flavor: default_api_flavor(),
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: default_timeout_secs(),
            keystore_dir: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".vela"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Get the default keystore directory
    pub fn default_keystore_dir() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("keystore"))
    }

    /// Load config from file or return default
    pub fn load() -> Self {
        let loaded = Self::config_path()
            .filter(|path| path.exists())
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|content| match toml::from_str(&content) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed config file");
                    None
                }
            });
        loaded.unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = Self::config_path()
            .ok_or_else(|| CliError::Config("cannot determine config path".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(path)
    }

    /// Get the keystore directory, using default if not configured
    pub fn keystore_dir(&self) -> Option<PathBuf> {
        self.keystore_dir.clone().or_else(Self::default_keystore_dir)
    }

    /// Parse a bech32 address carrying the configured prefix
    pub fn parse_address(&self, s: &str) -> Result<Address, CliError> {
        Address::from_bech32_with_hrp(s.trim(), &self.hrp)
            .map_err(|e| CliError::InvalidAddress(format!("{}: {}", s, e)))
    }

    /// Bech32 form of an address with the configured prefix
    pub fn format_address(&self, address: &Address) -> Result<String, CliError> {
        Ok(address.to_bech32_with_hrp(&self.hrp)?)
    }

    /// Parsed response flavor
    pub fn flavor(&self) -> Result<ApiFlavor, CliError> {
        match self.api_flavor.as_str() {
            "proxy" => Ok(ApiFlavor::Proxy),
            "api" => Ok(ApiFlavor::Api),
            other => Err(CliError::Config(format!(
                "api_flavor must be `proxy` or `api`, got `{}`",
                other
            ))),
        }
    }

    /// Provider for the configured endpoint
    pub fn provider(&self) -> Result<ProxyProvider, CliError> {
        Ok(ProxyProvider::connect(&self.proxy_url).with_flavor(self.flavor()?))
    }

    /// Watcher using the configured interval and timeout
    pub fn watcher<'a>(&self, provider: &'a ProxyProvider) -> TransactionWatcher<'a> {
        TransactionWatcher::new(provider)
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.proxy_url, "https://devnet-gateway.multiversx.com");
        assert_eq!(config.hrp, "erd");
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.flavor().unwrap(), ApiFlavor::Proxy);
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("proxy_url"));
        assert!(toml.contains("timeout_secs"));
        assert!(!toml.contains("keystore_dir"));
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            proxy_url = "http://localhost:7950"
            api_flavor = "api"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.proxy_url, "http://localhost:7950");
        assert_eq!(config.flavor().unwrap(), ApiFlavor::Api);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_address_prefix() {
        let config = Config::default();
        let alice = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";
        let address = config.parse_address(alice).unwrap();
        assert_eq!(config.format_address(&address).unwrap(), alice);

        let other = Config {
            hrp: "test".to_string(),
            ..Config::default()
        };
        assert!(other.parse_address(alice).is_err());
        assert!(other.format_address(&address).unwrap().starts_with("test1"));
    }

    #[test]
    fn test_config_bad_flavor() {
        let config = Config {
            api_flavor: "graphql".to_string(),
            ..Config::default()
        };
        assert!(config.flavor().is_err());
    }
}
