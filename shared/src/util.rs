use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::types::SATS_PER_BTC;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2026-01-01T12:00:00.000Z`.
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Generate a Snowflake-style i64 for use as record ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Convert a BTC amount to satoshis, dropping any fractional satoshi.
///
/// Truncates, never rounds: `0.000000019` BTC is `1` sat. Returns `None`
/// for negative amounts or amounts that do not fit in a `u64`.
pub fn btc_to_sats(amount: Decimal) -> Option<u64> {
    if amount < Decimal::ZERO {
        return None;
    }
    amount
        .checked_mul(Decimal::from(SATS_PER_BTC))?
        .floor()
        .to_u64()
}

/// Convert satoshis back to a BTC amount (exact, 8 decimal places)
pub fn sats_to_btc(sats: u64) -> Decimal {
    Decimal::from(sats) / Decimal::from(SATS_PER_BTC)
}
