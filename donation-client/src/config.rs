//! Donation client configuration
//!
//! Read from `config.json` in the data directory (defaults when absent),
//! then overridden by environment variables (`.env` is honoured).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::wallet::RpcWalletConfig;

/// Default receiving address for donations
pub const DEFAULT_DONATION_ADDRESS: &str = "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh";

/// Default block explorer host
pub const DEFAULT_EXPLORER_HOST: &str = "testnet.opnet.org";

/// How long the success message stays up before the form resets
pub const DEFAULT_SUCCESS_DELAY_MS: u64 = 3000;

fn default_donation_address() -> String {
    DEFAULT_DONATION_ADDRESS.to_string()
}

fn default_explorer_host() -> String {
    DEFAULT_EXPLORER_HOST.to_string()
}

fn default_success_delay_ms() -> u64 {
    DEFAULT_SUCCESS_DELAY_MS
}

fn default_rpc_timeout() -> u64 {
    30
}

/// Wallet JSON-RPC endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRpcSettings {
    pub url: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,
}

/// Donation client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationConfig {
    /// Address every donation is sent to
    #[serde(default = "default_donation_address")]
    pub donation_address: String,
    /// Host used for `https://<host>/tx/<txId>` links
    #[serde(default = "default_explorer_host")]
    pub explorer_host: String,
    /// Success display delay in milliseconds
    #[serde(default = "default_success_delay_ms")]
    pub success_delay_ms: u64,
    /// Wallet endpoint, if one is configured
    #[serde(default)]
    pub wallet_rpc: Option<WalletRpcSettings>,
}

impl Default for DonationConfig {
    fn default() -> Self {
        Self {
            donation_address: default_donation_address(),
            explorer_host: default_explorer_host(),
            success_delay_ms: default_success_delay_ms(),
            wallet_rpc: None,
        }
    }
}

impl DonationConfig {
    /// Load from a JSON file, defaults when the file is absent
    pub fn load(path: &Path) -> ClientResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| ClientError::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path`, then apply `.env` and process environment overrides
    pub fn load_with_env(path: &Path) -> ClientResult<Self> {
        let _ = dotenvy::dotenv();
        Self::load(path)?.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (environment variable names)
    pub fn with_overrides<F>(mut self, lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(address) = get("DONATION_ADDRESS") {
            self.donation_address = address.trim().to_string();
        }
        if let Some(host) = get("EXPLORER_HOST") {
            self.explorer_host = host.trim().to_string();
        }
        if let Some(delay) = get("SUCCESS_DELAY_MS") {
            self.success_delay_ms = delay
                .trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("SUCCESS_DELAY_MS is not a number: {}", delay)))?;
        }
        if let Some(url) = get("WALLET_RPC_URL") {
            let mut rpc = self.wallet_rpc.take().unwrap_or(WalletRpcSettings {
                url: String::new(),
                user: None,
                password: None,
                timeout_secs: default_rpc_timeout(),
            });
            rpc.url = url.trim().to_string();
            self.wallet_rpc = Some(rpc);
        }
        if let Some(rpc) = self.wallet_rpc.as_mut() {
            if let Some(user) = get("WALLET_RPC_USER") {
                rpc.user = Some(user);
            }
            if let Some(password) = get("WALLET_RPC_PASSWORD") {
                rpc.password = Some(password);
            }
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject settings the client cannot run with
    pub fn validate(&self) -> ClientResult<()> {
        if self.donation_address.trim().is_empty() {
            return Err(ClientError::Config("donation_address must not be empty".into()));
        }
        if self.explorer_host.trim().is_empty() {
            return Err(ClientError::Config("explorer_host must not be empty".into()));
        }
        if let Some(rpc) = &self.wallet_rpc
            && rpc.url.trim().is_empty()
        {
            return Err(ClientError::Config("wallet_rpc.url must not be empty".into()));
        }
        Ok(())
    }

    pub fn success_delay(&self) -> Duration {
        Duration::from_millis(self.success_delay_ms)
    }

    /// Wallet client settings, if an endpoint is configured
    pub fn rpc_wallet_config(&self) -> Option<RpcWalletConfig> {
        self.wallet_rpc.as_ref().map(|rpc| {
            let mut config = RpcWalletConfig::new(rpc.url.clone()).with_timeout(rpc.timeout_secs);
            if let Some(user) = &rpc.user {
                config = config.with_auth(user.clone(), rpc.password.clone().unwrap_or_default());
            }
            config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DonationConfig::default();
        assert_eq!(config.donation_address, DEFAULT_DONATION_ADDRESS);
        assert_eq!(config.explorer_host, "testnet.opnet.org");
        assert_eq!(config.success_delay(), Duration::from_secs(3));
        assert!(config.rpc_wallet_config().is_none());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = DonationConfig::load(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, DonationConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.json");
        let mut config = DonationConfig::default();
        config.explorer_host = "mempool.space".into();
        config.save(&path).unwrap();

        let loaded = DonationConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"explorer_host":"example.org"}"#).unwrap();

        let loaded = DonationConfig::load(&path).unwrap();
        assert_eq!(loaded.explorer_host, "example.org");
        assert_eq!(loaded.donation_address, DEFAULT_DONATION_ADDRESS);
    }

    #[test]
    fn test_env_overrides() {
        let config = DonationConfig::default()
            .with_overrides(env(&[
                ("DONATION_ADDRESS", "tb1qdest"),
                ("SUCCESS_DELAY_MS", "10"),
                ("WALLET_RPC_URL", "http://127.0.0.1:18332"),
                ("WALLET_RPC_USER", "rpc"),
                ("WALLET_RPC_PASSWORD", "secret"),
            ]))
            .unwrap();

        assert_eq!(config.donation_address, "tb1qdest");
        assert_eq!(config.success_delay_ms, 10);
        let rpc = config.rpc_wallet_config().unwrap();
        assert_eq!(rpc.url, "http://127.0.0.1:18332");
        assert_eq!(rpc.user.as_deref(), Some("rpc"));
        assert_eq!(rpc.password.as_deref(), Some("secret"));
        assert_eq!(rpc.timeout, 30);
    }

    #[test]
    fn test_bad_delay_is_config_error() {
        let err = DonationConfig::default()
            .with_overrides(env(&[("SUCCESS_DELAY_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
