//! Shared types for the donation workspace
//!
//! Data model of the local donation ledger plus the small unit and id
//! utilities used by both the client library and the CLI.

pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use models::donation::{DonationRecord, DonationStatus};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
