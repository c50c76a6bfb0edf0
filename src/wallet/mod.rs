//! Wallet module
//!
//! The tipper consumes a wallet through the `WalletBackend` trait:
//! - Connector discovery and connection
//! - Session snapshots published over a watch channel
//! - Network switching (awaited or fire-and-forget)
//! - Transfer submission and receipt polling
//!
//! # Architecture
//!
//! ```text
//! TipperApp → TipController → WalletBackend ← Eip1193Wallet (HTTP JSON-RPC)
//!                 ↓                ↑
//!            NetworkGuard ─────────┘
//! ```

pub mod backend;
pub mod eip1193;
#[cfg(test)]
pub(crate) mod mock;
pub mod types;

pub use backend::WalletBackend;
pub use eip1193::Eip1193Wallet;
pub use types::{ConnectorInfo, TransactionReceipt, WalletSession};
