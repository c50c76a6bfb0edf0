//! Tip module - the transaction lifecycle
//!
//! A tip moves through:
//!
//! ```text
//! Idle → AwaitingWalletApproval → Confirming → Confirmed
//!                 ↓                    ↓
//!               Failed ←───────────────┘
//! ```

pub mod controller;
pub mod request;
pub mod state;

pub use controller::{TipController, TipSettings};
pub use request::{TipRequest, ValidatedTip};
pub use state::{FailureKind, FailureReason, TipEvent, TransactionState};
