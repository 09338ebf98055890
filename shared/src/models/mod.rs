//! Data models
//!
//! Serialized with camelCase keys so ledgers stay readable by the web
//! front-end that shares the same storage format.

pub mod donation;

pub use donation::{DonationRecord, DonationStatus};
