//! Transaction lifecycle states

use std::fmt;

use alloy_primitives::TxHash;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Error;

/// Message shown for every failed tip, whatever went wrong
pub const TIP_FAILED_MESSAGE: &str = "Failed to send tip. Check logs for details.";

/// Where a submitted tip currently stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransactionState {
    /// Nothing submitted this session
    #[default]
    Idle,
    /// Waiting for the user to approve inside the wallet
    AwaitingWalletApproval,
    /// Broadcast, waiting for inclusion
    Confirming { tx_hash: TxHash },
    /// Included in a block
    Confirmed {
        tx_hash: TxHash,
        block_number: Option<u64>,
    },
    /// Terminal failure for this submission
    Failed(FailureReason),
}

impl TransactionState {
    /// Check if a tip is still in flight
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            TransactionState::AwaitingWalletApproval | TransactionState::Confirming { .. }
        )
    }

    /// Check if this state ends the submission
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionState::Confirmed { .. } | TransactionState::Failed(_)
        )
    }

    /// Hash of the transaction, once the wallet has returned one
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            TransactionState::Confirming { tx_hash } | TransactionState::Confirmed { tx_hash, .. } => {
                Some(*tx_hash)
            }
            _ => None,
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionState::Idle => write!(f, "Idle"),
            TransactionState::AwaitingWalletApproval => write!(f, "Approve in Wallet..."),
            TransactionState::Confirming { .. } => write!(f, "Confirming..."),
            TransactionState::Confirmed { .. } => write!(f, "Tip Sent Successfully!"),
            TransactionState::Failed(_) => write!(f, "{}", TIP_FAILED_MESSAGE),
        }
    }
}

/// Broad cause of a failed tip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// User declined in the wallet
    Rejected,
    /// Wallet threw while handling the request
    Wallet,
    /// Broadcast or receipt lookup failed
    Network,
    /// Included but reverted
    Reverted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Rejected => write!(f, "rejected"),
            FailureKind::Wallet => write!(f, "wallet"),
            FailureKind::Network => write!(f, "network"),
            FailureKind::Reverted => write!(f, "reverted"),
        }
    }
}

/// Why a tip failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason {
    pub kind: FailureKind,

    /// Detail for logs; not shown to the user
    pub detail: String,
}

impl FailureReason {
    pub fn from_error(error: &Error) -> Self {
        let kind = match error {
            Error::UserRejected(_) => FailureKind::Rejected,
            Error::Reverted(_) => FailureKind::Reverted,
            Error::Rpc(_) | Error::RpcResponse { .. } => FailureKind::Network,
            _ => FailureKind::Wallet,
        };
        Self {
            kind,
            detail: error.to_string(),
        }
    }

    /// User-facing text, identical for every kind
    pub fn user_message(&self) -> &'static str {
        TIP_FAILED_MESSAGE
    }
}

/// One published state transition
#[derive(Debug, Clone)]
pub struct TipEvent {
    /// Submission this transition belongs to
    pub tip_id: Uuid,
    pub state: TransactionState,
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_properties() {
        assert!(!TransactionState::Idle.is_pending());
        assert!(TransactionState::AwaitingWalletApproval.is_pending());

        let hash = TxHash::repeat_byte(1);
        let confirming = TransactionState::Confirming { tx_hash: hash };
        assert!(confirming.is_pending());
        assert_eq!(confirming.tx_hash(), Some(hash));

        let confirmed = TransactionState::Confirmed {
            tx_hash: hash,
            block_number: Some(7),
        };
        assert!(confirmed.is_terminal());
        assert!(!confirmed.is_pending());
    }

    #[test]
    fn test_failure_classification() {
        let rejected = FailureReason::from_error(&Error::UserRejected("no".into()));
        assert_eq!(rejected.kind, FailureKind::Rejected);

        let network = FailureReason::from_error(&Error::Rpc("timeout".into()));
        assert_eq!(network.kind, FailureKind::Network);

        let reverted = FailureReason::from_error(&Error::Reverted("0x11".into()));
        assert_eq!(reverted.kind, FailureKind::Reverted);

        // Same message whatever the cause
        assert_eq!(rejected.user_message(), network.user_message());
        assert_eq!(network.user_message(), reverted.user_message());
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(
            TransactionState::AwaitingWalletApproval.to_string(),
            "Approve in Wallet..."
        );
        let failed = TransactionState::Failed(FailureReason {
            kind: FailureKind::Wallet,
            detail: "boom".into(),
        });
        assert_eq!(failed.to_string(), TIP_FAILED_MESSAGE);
    }
}
