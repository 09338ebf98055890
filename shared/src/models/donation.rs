//! Donation Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ANONYMOUS_DONOR;

/// Donation lifecycle flag
///
/// Records are created `Pending` and nothing moves them further yet:
/// there is no confirmation tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    #[default]
    Pending,
    Confirmed,
    Failed,
}

/// One entry of the local donation ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    /// Unique within the ledger
    pub id: i64,
    /// Display name ("Anonymous" when left empty)
    pub name: String,
    /// BTC amount as entered, not the satoshi-converted value.
    /// Written as an exact JSON number; legacy float values still parse.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    /// Optional free text
    #[serde(default)]
    pub message: String,
    /// Creation time (ISO 8601, client clock)
    pub timestamp: String,
    /// Wallet-reported transaction id; `txHash` is the legacy key
    #[serde(default, alias = "txHash", skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    #[serde(default)]
    pub status: DonationStatus,
}

impl DonationRecord {
    /// Build the record for a send the wallet just accepted.
    pub fn new_pending(
        id: i64,
        name: &str,
        amount: Decimal,
        message: &str,
        tx_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: display_name(name),
            amount,
            message: message.to_string(),
            timestamp: crate::util::now_iso8601(),
            tx_id: Some(tx_id.into()),
            status: DonationStatus::Pending,
        }
    }

    /// Whether this record counts toward the raised total
    pub fn counts_toward_total(&self) -> bool {
        self.status != DonationStatus::Failed
    }
}

/// Donor name as shown in the ledger
pub fn display_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        ANONYMOUS_DONOR.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sum of `amount` over records that are not `Failed`
pub fn total_donated<'a, I>(records: I) -> Decimal
where
    I: IntoIterator<Item = &'a DonationRecord>,
{
    records
        .into_iter()
        .filter(|r| r.counts_toward_total())
        .map(|r| r.amount)
        .sum()
}
