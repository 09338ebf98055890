//! Presentation helpers
//!
//! Pure functions over the ledger and submission state, shared by every
//! front-end (the CLI here).

use rust_decimal::Decimal;
use serde::Serialize;
use shared::DonationRecord;

use crate::coordinator::{DonationForm, SubmissionState};

/// `0.001` -> `0.00100000 BTC`
pub fn format_btc(amount: Decimal) -> String {
    format!("{:.8} BTC", amount)
}

/// `https://<host>/tx/<txId>`
pub fn explorer_tx_url(host: &str, tx_id: &str) -> String {
    format!("https://{}/tx/{}", host.trim_end_matches('/'), tx_id)
}

/// Label of the submit button
pub fn submit_label(state: &SubmissionState) -> &'static str {
    match state {
        SubmissionState::Signing => "Check Wallet...",
        SubmissionState::Success { .. } => "Sent!",
        _ => "Confirm Donation",
    }
}

pub fn can_submit(state: &SubmissionState) -> bool {
    !state.is_busy()
}

/// Message under the form, if any
pub fn status_banner(state: &SubmissionState) -> Option<String> {
    match state {
        SubmissionState::Success { .. } => Some("Transaction Sent!".to_string()),
        SubmissionState::Failed { error } => Some(error.clone()),
        _ => None,
    }
}

/// Record timestamp rendered in local time, `HH:MM:SS`
pub fn local_time(timestamp: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.with_timezone(&chrono::Local).format("%H:%M:%S").to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// One row of the transaction list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationRow {
    pub id: i64,
    pub name: String,
    /// `+0.001 BTC`
    pub amount: String,
    pub message: Option<String>,
    pub time: String,
    pub explorer_url: Option<String>,
}

impl DonationRow {
    pub fn from_record(record: &DonationRecord, explorer_host: &str) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            amount: format!("+{} BTC", record.amount.normalize()),
            message: Some(record.message.clone()).filter(|m| !m.is_empty()),
            time: local_time(&record.timestamp),
            explorer_url: record
                .tx_id
                .as_deref()
                .map(|tx| explorer_tx_url(explorer_host, tx)),
        }
    }
}

/// Everything a front-end needs to draw the page
#[derive(Debug, Clone, Serialize)]
pub struct DonationView {
    pub total: Decimal,
    pub total_label: String,
    pub rows: Vec<DonationRow>,
    pub state: SubmissionState,
    pub form: DonationForm,
    pub modal_open: bool,
    pub submit_label: &'static str,
    pub can_submit: bool,
    pub banner: Option<String>,
}

impl DonationView {
    pub fn new(
        total: Decimal,
        records: Vec<DonationRecord>,
        state: SubmissionState,
        form: DonationForm,
        modal_open: bool,
        explorer_host: &str,
    ) -> Self {
        Self {
            total,
            total_label: format_btc(total),
            rows: records
                .iter()
                .map(|r| DonationRow::from_record(r, explorer_host))
                .collect(),
            submit_label: submit_label(&state),
            can_submit: can_submit(&state),
            banner: status_banner(&state),
            state,
            form,
            modal_open,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
