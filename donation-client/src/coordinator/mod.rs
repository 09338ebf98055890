//! Donation coordinator
//!
//! Owns the submission state machine, the form and the ledger. The wallet
//! call is the only suspension point; every ledger write happens in the
//! completion path of [`DonationCoordinator::submit`].

mod form;
mod state;

pub use form::{DonationForm, FormError, parse_amount};
pub use state::{SubmissionState, SubmitOutcome};

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::DonationRecord;
use tokio::sync::RwLock;

use crate::config::DonationConfig;
use crate::error::ClientResult;
use crate::ledger::Ledger;
use crate::store::KeyValueStore;
use crate::view::DonationView;
use crate::wallet::WalletSession;

/// Shown when submit is attempted without a connected wallet
pub const WALLET_NOT_CONNECTED: &str = "Wallet not connected";

/// Shown when the wallet fails without a message
pub const GENERIC_FAILURE: &str = "Transaction failed";

#[derive(Debug, Default)]
struct UiState {
    state: SubmissionState,
    form: DonationForm,
    modal_open: bool,
    /// Bumped by every submit and cancel; completions of older attempts
    /// no longer touch the UI state.
    attempt: u64,
}

/// Donation submission coordinator
pub struct DonationCoordinator {
    config: DonationConfig,
    ledger: RwLock<Ledger>,
    ui: RwLock<UiState>,
}

impl DonationCoordinator {
    /// Load the ledger from `store` and start idle
    pub fn new(config: DonationConfig, store: Arc<dyn KeyValueStore>) -> ClientResult<Arc<Self>> {
        let ledger = Ledger::load(store)?;
        Ok(Arc::new(Self {
            config,
            ledger: RwLock::new(ledger),
            ui: RwLock::new(UiState::default()),
        }))
    }

    pub fn config(&self) -> &DonationConfig {
        &self.config
    }

    // ============ Modal ============

    /// Open the donation modal; only possible with a connected wallet
    pub async fn open_modal(&self, session: &WalletSession) -> bool {
        if !session.is_connected() {
            return false;
        }
        self.ui.write().await.modal_open = true;
        true
    }

    /// Close the modal and return to `Idle` without side effects
    pub async fn cancel(&self) {
        let mut ui = self.ui.write().await;
        ui.attempt += 1;
        ui.state = SubmissionState::Idle;
        ui.modal_open = false;
        tracing::debug!("Donation modal cancelled");
    }

    /// Replace the form fields
    pub async fn set_form(&self, form: DonationForm) {
        self.ui.write().await.form = form;
    }

    pub async fn form(&self) -> DonationForm {
        self.ui.read().await.form.clone()
    }

    pub async fn is_modal_open(&self) -> bool {
        self.ui.read().await.modal_open
    }

    pub async fn state(&self) -> SubmissionState {
        self.ui.read().await.state.clone()
    }

    // ============ Submission ============

    /// Submit the current form through the session's wallet.
    ///
    /// No-op while a submission is signing or its success is on display.
    pub async fn submit(self: &Arc<Self>, session: &WalletSession) -> SubmitOutcome {
        let (attempt, form, sender) = {
            let mut ui = self.ui.write().await;
            if ui.state.is_busy() {
                tracing::debug!(state = %ui.state, "Submit ignored, submission in progress");
                return SubmitOutcome::Ignored;
            }
            ui.attempt += 1;

            let Some(sender) = session.sender() else {
                tracing::warn!("Donation submitted without a connected wallet");
                ui.state = SubmissionState::Failed {
                    error: WALLET_NOT_CONNECTED.to_string(),
                };
                return SubmitOutcome::Failed {
                    error: WALLET_NOT_CONNECTED.to_string(),
                };
            };

            ui.state = SubmissionState::Signing;
            (ui.attempt, ui.form.clone(), sender)
        };

        let amount = match form.validate() {
            Ok(amount) => amount,
            Err(e) => return self.fail(attempt, e.to_string()).await,
        };
        let Some(amount_sats) = shared::util::btc_to_sats(amount) else {
            return self
                .fail(attempt, format!("Invalid amount: {}", form.amount.trim()))
                .await;
        };

        tracing::info!(attempt, amount = %amount, amount_sats, "Submitting donation to wallet");

        match sender
            .send_bitcoin(&self.config.donation_address, amount_sats)
            .await
        {
            Ok(tx_id) => self.complete(attempt, &form, amount, tx_id).await,
            Err(e) => {
                let error = e.message().unwrap_or_else(|| GENERIC_FAILURE.to_string());
                tracing::warn!(attempt, error = %e, "Wallet send failed");
                self.fail(attempt, error).await
            }
        }
    }

    async fn complete(
        self: &Arc<Self>,
        attempt: u64,
        form: &DonationForm,
        amount: Decimal,
        tx_id: String,
    ) -> SubmitOutcome {
        // Funds have moved: record even if the attempt was cancelled meanwhile
        let (record, persisted) = {
            let mut ledger = self.ledger.write().await;
            let record =
                DonationRecord::new_pending(ledger.next_id(), &form.name, amount, &form.message, &tx_id);
            let persisted = match ledger.append(record.clone()) {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(tx_id = %tx_id, error = %e, "Failed to persist donation ledger");
                    false
                }
            };
            (record, persisted)
        };

        {
            let mut ui = self.ui.write().await;
            if ui.attempt == attempt {
                ui.state = SubmissionState::Success {
                    tx_id: tx_id.clone(),
                };
            }
        }

        tracing::info!(attempt, tx_id = %tx_id, id = record.id, "Donation sent");
        self.schedule_reset(attempt);

        SubmitOutcome::Sent { record, persisted }
    }

    async fn fail(&self, attempt: u64, error: String) -> SubmitOutcome {
        let mut ui = self.ui.write().await;
        if ui.attempt == attempt {
            ui.state = SubmissionState::Failed {
                error: error.clone(),
            };
        }
        SubmitOutcome::Failed { error }
    }

    /// After the success delay: clear the form, close the modal, go idle
    fn schedule_reset(self: &Arc<Self>, attempt: u64) {
        let this = Arc::clone(self);
        let delay = self.config.success_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut ui = this.ui.write().await;
            if ui.attempt == attempt && matches!(ui.state, SubmissionState::Success { .. }) {
                ui.state = SubmissionState::Idle;
                ui.form.clear();
                ui.modal_open = false;
                tracing::debug!(attempt, "Donation form reset");
            }
        });
    }

    // ============ Ledger ============

    /// Ledger records, most-recent-first
    pub async fn records(&self) -> Vec<DonationRecord> {
        self.ledger.read().await.records().to_vec()
    }

    pub async fn total_donated(&self) -> Decimal {
        self.ledger.read().await.total_donated()
    }

    /// Snapshot for rendering
    pub async fn view(&self) -> DonationView {
        let (records, total) = {
            let ledger = self.ledger.read().await;
            (ledger.records().to_vec(), ledger.total_donated())
        };
        let ui = self.ui.read().await;
        DonationView::new(
            total,
            records,
            ui.state.clone(),
            ui.form.clone(),
            ui.modal_open,
            &self.config.explorer_host,
        )
    }
}
