//! The wallet boundary
//!
//! The tipper never signs anything itself. Every connection, network switch
//! and transfer goes through a `WalletBackend`.

use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use tokio::sync::watch;

use crate::chain::TransferCall;
use crate::error::Result;

use super::types::{ConnectorInfo, TransactionReceipt, WalletSession};

/// Trait for wallet connection libraries
#[async_trait]
pub trait WalletBackend: Send + Sync {
    /// Connectors the user may pick from
    fn connectors(&self) -> Vec<ConnectorInfo>;

    /// Attach through `connector_id`, asking for `chain_id` if given
    async fn connect(&self, connector_id: &str, chain_id: Option<u64>) -> Result<WalletSession>;

    /// Drop the current session
    async fn disconnect(&self) -> Result<()>;

    /// Current session snapshot
    fn session(&self) -> WalletSession;

    /// Receiver that observes every session change
    fn subscribe_session(&self) -> watch::Receiver<WalletSession>;

    /// Ask the wallet to switch networks without waiting for the outcome
    fn request_network_switch(&self, chain_id: u64);

    /// Switch networks and wait for the wallet to report back
    async fn switch_network(&self, chain_id: u64) -> Result<()>;

    /// Hand a token transfer to the wallet for approval and broadcast
    async fn submit_transfer(&self, call: &TransferCall) -> Result<TxHash>;

    /// Wait until the network includes `tx_hash`
    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<TransactionReceipt>;

    /// Read-only contract call against the latest block
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;
}
