//! Submission states

use serde::Serialize;
use shared::DonationRecord;

/// Donation form state machine
///
/// `Idle -> Signing -> Success | Failed`, and back to `Idle` either after
/// the success delay or on cancel. `Broadcasting` is never entered: the
/// wallet signs and broadcasts in a single call. It still disables submit
/// so a wallet that reports the two phases separately can be wired in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Signing,
    Broadcasting,
    Success {
        #[serde(rename = "txId")]
        tx_id: String,
    },
    Failed {
        error: String,
    },
}

impl SubmissionState {
    /// Submit is a no-op in these states
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SubmissionState::Signing | SubmissionState::Broadcasting | SubmissionState::Success { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Signing => "signing",
            SubmissionState::Broadcasting => "broadcasting",
            SubmissionState::Success { .. } => "success",
            SubmissionState::Failed { .. } => "failed",
        }
    }

    /// Error text while `Failed`
    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed { error } => Some(error),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one submit call
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A submission was already in progress or just succeeded
    Ignored,
    /// Wallet accepted the payment; `persisted` is false if the ledger write failed
    Sent {
        record: DonationRecord,
        persisted: bool,
    },
    /// Nothing was sent and the ledger is unchanged
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_states() {
        assert!(!SubmissionState::Idle.is_busy());
        assert!(SubmissionState::Signing.is_busy());
        assert!(SubmissionState::Broadcasting.is_busy());
        assert!(SubmissionState::Success { tx_id: "a".into() }.is_busy());
        assert!(!SubmissionState::Failed { error: "e".into() }.is_busy());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(SubmissionState::Success { tx_id: "abc".into() }).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["txId"], "abc");

        let json = serde_json::to_value(SubmissionState::Idle).unwrap();
        assert_eq!(json["status"], "idle");
    }
}
