//! Core types for the wallet boundary
//!
//! Defines the session snapshot, connector descriptors, and receipts.

use alloy_primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};

/// Snapshot of the wallet connection
///
/// Owned by the wallet backend. Everything else reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    /// Active account, if connected
    pub address: Option<Address>,

    /// Network the wallet currently targets
    pub connected_network_id: Option<u64>,

    /// Whether a connector is attached
    pub is_connected: bool,

    /// Connector used for this session
    pub connector_id: Option<String>,
}

impl WalletSession {
    /// A session with nothing attached
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// A live session on `chain_id`
    pub fn connected(connector_id: &str, address: Address, chain_id: u64) -> Self {
        Self {
            address: Some(address),
            connected_network_id: Some(chain_id),
            is_connected: true,
            connector_id: Some(connector_id.to_string()),
        }
    }

    /// Checksummed address string, if connected
    pub fn address_string(&self) -> Option<String> {
        self.address.map(|a| a.to_string())
    }

    /// Check if the session is connected to `chain_id`
    pub fn is_on_network(&self, chain_id: u64) -> bool {
        self.is_connected && self.connected_network_id == Some(chain_id)
    }
}

/// A wallet integration the user can connect through
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorInfo {
    /// Stable identifier: "frame"
    pub id: String,

    /// Human-readable name: "Frame"
    pub name: String,

    /// EIP-1193 JSON-RPC endpoint exposed by the wallet
    pub rpc_url: String,
}

/// Inclusion record for a submitted transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub tx_hash: TxHash,

    /// Block the transaction landed in
    pub block_number: Option<u64>,

    /// False when the network reports a revert
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_network_check() {
        let session = WalletSession::connected("frame", Address::ZERO, 8453);
        assert!(session.is_on_network(8453));
        assert!(!session.is_on_network(10));

        let session = WalletSession::disconnected();
        assert!(!session.is_on_network(8453));
        assert!(session.address_string().is_none());
    }

    #[test]
    fn test_session_serialization() {
        let session = WalletSession::connected("frame", Address::ZERO, 8453);
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"connectedNetworkId\":8453"));
        assert!(json.contains("\"isConnected\":true"));
    }
}
