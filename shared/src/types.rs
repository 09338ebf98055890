//! Common types for the shared crate

/// Satoshis per BTC
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Name recorded when the donor leaves the field empty
pub const ANONYMOUS_DONOR: &str = "Anonymous";
