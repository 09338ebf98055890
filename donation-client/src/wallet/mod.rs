//! Wallet seam
//!
//! The wallet constructs, signs and broadcasts payments; this crate only
//! asks it for an address and hands it a destination plus an amount.

mod rpc;

pub use rpc::{RpcWallet, RpcWalletConfig};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Wallet failure. Payloads are opaque: only the message is surfaced.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The wallet refused the request (user rejection, insufficient funds...)
    #[error("{0}")]
    Rejected(String),

    /// JSON-RPC error object returned by the wallet node
    #[error("{message}")]
    Rpc { code: i64, message: String },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Failure without any message
    #[error("Unknown wallet error")]
    Unknown,
}

impl WalletError {
    /// Text to show the user, if the wallet supplied any
    pub fn message(&self) -> Option<String> {
        let text = match self {
            WalletError::Rejected(msg) => msg.clone(),
            WalletError::Rpc { message, .. } => message.clone(),
            WalletError::Http(e) => e.to_string(),
            WalletError::InvalidResponse(msg) => msg.clone(),
            WalletError::Unknown => return None,
        };
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

/// External wallet capability
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for its addresses (the "connect" step)
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Build, sign and broadcast a payment; returns the transaction id
    async fn send_bitcoin(&self, address: &str, amount_sats: u64) -> Result<String, WalletError>;
}

/// Connection handle to a wallet
#[derive(Clone, Default)]
pub struct WalletSession {
    connected: Option<Connected>,
}

#[derive(Clone)]
struct Connected {
    address: String,
    provider: Arc<dyn WalletProvider>,
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("address", &self.address())
            .finish()
    }
}

impl WalletSession {
    /// A session with no wallet connected
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Connect to `provider`, keeping its first address.
    pub async fn connect(&mut self, provider: Arc<dyn WalletProvider>) -> Result<(), WalletError> {
        let accounts = provider.request_accounts().await?;
        let address = accounts
            .into_iter()
            .find(|a| !a.trim().is_empty())
            .ok_or_else(|| WalletError::InvalidResponse("wallet returned no accounts".to_string()))?;

        tracing::info!(address = %short_address(&address), "Wallet connected");
        self.connected = Some(Connected { address, provider });
        Ok(())
    }

    /// Tear the session down
    pub fn disconnect(&mut self) {
        if self.connected.take().is_some() {
            tracing::info!("Wallet disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.is_some()
    }

    /// Currently connected address
    pub fn address(&self) -> Option<&str> {
        self.connected.as_ref().map(|c| c.address.as_str())
    }

    /// Connected address shortened for display
    pub fn short_address(&self) -> Option<String> {
        self.address().map(short_address)
    }

    /// Send capability, only while connected
    pub fn sender(&self) -> Option<Arc<dyn WalletProvider>> {
        self.connected.as_ref().map(|c| c.provider.clone())
    }
}

/// `bc1qxy2k...0wlh` -> `bc1q...0wlh`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAccounts(Vec<String>);

    #[async_trait]
    impl WalletProvider for FixedAccounts {
        async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
            Ok(self.0.clone())
        }

        async fn send_bitcoin(&self, _address: &str, _amount_sats: u64) -> Result<String, WalletError> {
            Err(WalletError::Unknown)
        }
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh"),
            "bc1q...0wlh"
        );
        assert_eq!(short_address("abcd"), "abcd");
    }

    #[test]
    fn test_error_message_passthrough() {
        assert_eq!(
            WalletError::Rejected("User rejected".into()).message().as_deref(),
            Some("User rejected")
        );
        assert_eq!(
            WalletError::Rpc { code: -6, message: "Insufficient funds".into() }
                .message()
                .as_deref(),
            Some("Insufficient funds")
        );
        assert_eq!(WalletError::Rejected("  ".into()).message(), None);
        assert_eq!(WalletError::Unknown.message(), None);
    }

    #[tokio::test]
    async fn test_session_connect_and_disconnect() {
        let mut session = WalletSession::disconnected();
        assert!(session.sender().is_none());

        let provider = Arc::new(FixedAccounts(vec!["tb1qexampleaddress0000".into()]));
        session.connect(provider).await.unwrap();
        assert!(session.is_connected());
        assert_eq!(session.address(), Some("tb1qexampleaddress0000"));
        assert_eq!(session.short_address().as_deref(), Some("tb1q...0000"));
        assert!(session.sender().is_some());

        session.disconnect();
        assert!(!session.is_connected());
        assert!(session.sender().is_none());
    }

    #[tokio::test]
    async fn test_connect_without_accounts_fails() {
        let mut session = WalletSession::disconnected();
        let err = session
            .connect(Arc::new(FixedAccounts(vec![])))
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidResponse(_)));
        assert!(!session.is_connected());
    }
}
