//! JSON-RPC wallet
//!
//! Talks to a Bitcoin Core compatible wallet endpoint. `sendtoaddress`
//! builds, signs and broadcasts in one call and returns the txid.

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::util::sats_to_btc;

use super::{WalletError, WalletProvider};

/// Wallet endpoint settings
#[derive(Debug, Clone)]
pub struct RpcWalletConfig {
    /// Endpoint URL (e.g., "http://127.0.0.1:18332/wallet/donations")
    pub url: String,
    /// Basic auth user
    pub user: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl RpcWalletConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: None,
            password: None,
            timeout: 30,
        }
    }

    /// Set basic auth credentials
    pub fn with_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct JsonRpcResponse<T> {
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ReceivedEntry {
    address: String,
}

/// Wallet reached over JSON-RPC
#[derive(Debug)]
pub struct RpcWallet {
    client: Client,
    config: RpcWalletConfig,
    next_id: AtomicU64,
}

impl RpcWallet {
    pub fn new(config: RpcWalletConfig) -> Result<Self, WalletError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, WalletError> {
        let body = JsonRpcRequest {
            jsonrpc: "1.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let mut request = self.client.post(&self.config.url).json(&body);
        if let Some(user) = &self.config.user {
            request = request.basic_auth(user, self.config.password.as_ref());
        }

        tracing::debug!(method = %method, id = body.id, "Wallet RPC call");
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(WalletError::Rejected(format!(
                "Wallet RPC authentication failed ({})",
                status
            )));
        }

        // RPC errors come back as non-2xx with a JSON body, so parse regardless of status
        let text = response.text().await?;
        let parsed: JsonRpcResponse<T> = serde_json::from_str(&text)
            .map_err(|e| WalletError::InvalidResponse(format!("HTTP {}: {}", status, e)))?;

        if let Some(err) = parsed.error {
            return Err(WalletError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        parsed
            .result
            .ok_or_else(|| WalletError::InvalidResponse(format!("{} returned no result", method)))
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        let entries: Vec<ReceivedEntry> = self
            .call("listreceivedbyaddress", json!([0, true]))
            .await?;
        Ok(entries.into_iter().map(|e| e.address).collect())
    }

    async fn send_bitcoin(&self, address: &str, amount_sats: u64) -> Result<String, WalletError> {
        // exact decimal text, no f64 detour
        let amount_btc = serde_json::Number::from_str(&sats_to_btc(amount_sats).to_string())
            .map_err(|e| WalletError::InvalidResponse(format!("amount {}: {}", amount_sats, e)))?;
        let tx_id: String = self
            .call("sendtoaddress", json!([address, amount_btc]))
            .await?;
        tracing::info!(tx_id = %tx_id, amount_sats, "Wallet broadcast payment");
        Ok(tx_id)
    }
}
