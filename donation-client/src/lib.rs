//! Donation Client - wallet-backed donation submission with a local ledger
//!
//! Drives the donation form state machine, hands the payment to an external
//! wallet, and keeps the donation history in a key/value store.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod ledger;
pub mod store;
pub mod view;
pub mod wallet;

pub use config::DonationConfig;
pub use coordinator::{DonationCoordinator, DonationForm, FormError, SubmissionState, SubmitOutcome};
pub use error::{ClientError, ClientResult};
pub use ledger::{LEDGER_KEY, Ledger};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use view::DonationView;
pub use wallet::{RpcWallet, WalletError, WalletProvider, WalletSession};

// Re-export shared types for convenience
pub use shared::{Decimal, DonationRecord, DonationStatus};
