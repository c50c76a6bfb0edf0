//! Scriptable wallet backend for tests

use std::sync::Mutex;

use alloy_primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use tokio::sync::{watch, Notify};

use crate::chain::TransferCall;
use crate::error::{Error, Result};

use super::backend::WalletBackend;
use super::types::{ConnectorInfo, TransactionReceipt, WalletSession};

/// What the mock does when asked to submit a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBehavior {
    Approve,
    Reject,
    Fail,
}

/// What the network reports for a submitted transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptBehavior {
    Success,
    Revert,
    Fail,
}

pub const MOCK_TX_HASH: TxHash = TxHash::repeat_byte(0x11);

pub struct MockWallet {
    session: watch::Sender<WalletSession>,
    pub switch_requests: Mutex<Vec<u64>>,
    pub submitted: Mutex<Vec<TransferCall>>,
    pub submit_behavior: Mutex<SubmitBehavior>,
    pub receipt_behavior: Mutex<ReceiptBehavior>,
    pub decimals: Mutex<u8>,
    /// When set, submissions wait for `release_approval`
    hold_approval: bool,
    approval: Notify,
}

impl MockWallet {
    pub fn new() -> Self {
        let (session, _) = watch::channel(WalletSession::disconnected());
        Self {
            session,
            switch_requests: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            submit_behavior: Mutex::new(SubmitBehavior::Approve),
            receipt_behavior: Mutex::new(ReceiptBehavior::Success),
            decimals: Mutex::new(18),
            hold_approval: false,
            approval: Notify::new(),
        }
    }

    /// A mock already connected on `chain_id`
    pub fn connected_on(chain_id: u64) -> Self {
        let wallet = Self::new();
        wallet.set_session(WalletSession::connected(
            "mock",
            Address::repeat_byte(0xab),
            chain_id,
        ));
        wallet
    }

    pub fn holding_approval(mut self) -> Self {
        self.hold_approval = true;
        self
    }

    pub fn release_approval(&self) {
        self.approval.notify_one();
    }

    pub fn set_session(&self, session: WalletSession) {
        self.session.send_replace(session);
    }

    pub fn set_submit(&self, behavior: SubmitBehavior) {
        *self.submit_behavior.lock().unwrap() = behavior;
    }

    pub fn set_receipt(&self, behavior: ReceiptBehavior) {
        *self.receipt_behavior.lock().unwrap() = behavior;
    }

    pub fn switch_count(&self) -> usize {
        self.switch_requests.lock().unwrap().len()
    }

    pub fn submit_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl WalletBackend for MockWallet {
    fn connectors(&self) -> Vec<ConnectorInfo> {
        vec![ConnectorInfo {
            id: "mock".to_string(),
            name: "Mock Wallet".to_string(),
            rpc_url: "http://mock".to_string(),
        }]
    }

    async fn connect(&self, connector_id: &str, chain_id: Option<u64>) -> Result<WalletSession> {
        if connector_id != "mock" {
            return Err(Error::UnknownConnector(connector_id.to_string()));
        }
        let session =
            WalletSession::connected("mock", Address::repeat_byte(0xab), chain_id.unwrap_or(1));
        self.set_session(session.clone());
        Ok(session)
    }

    async fn disconnect(&self) -> Result<()> {
        self.set_session(WalletSession::disconnected());
        Ok(())
    }

    fn session(&self) -> WalletSession {
        self.session.borrow().clone()
    }

    fn subscribe_session(&self) -> watch::Receiver<WalletSession> {
        self.session.subscribe()
    }

    fn request_network_switch(&self, chain_id: u64) {
        self.switch_requests.lock().unwrap().push(chain_id);
    }

    async fn switch_network(&self, chain_id: u64) -> Result<()> {
        self.switch_requests.lock().unwrap().push(chain_id);
        self.session.send_modify(|s| s.connected_network_id = Some(chain_id));
        Ok(())
    }

    async fn submit_transfer(&self, call: &TransferCall) -> Result<TxHash> {
        self.submitted.lock().unwrap().push(call.clone());
        if self.hold_approval {
            self.approval.notified().await;
        }
        let behavior = *self.submit_behavior.lock().unwrap();
        match behavior {
            SubmitBehavior::Approve => Ok(MOCK_TX_HASH),
            SubmitBehavior::Reject => Err(Error::UserRejected("User denied transaction".into())),
            SubmitBehavior::Fail => Err(Error::Wallet("connector crashed".into())),
        }
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<TransactionReceipt> {
        let behavior = *self.receipt_behavior.lock().unwrap();
        match behavior {
            ReceiptBehavior::Success => Ok(TransactionReceipt {
                tx_hash,
                block_number: Some(42),
                success: true,
            }),
            ReceiptBehavior::Revert => Ok(TransactionReceipt {
                tx_hash,
                block_number: Some(42),
                success: false,
            }),
            ReceiptBehavior::Fail => Err(Error::Rpc("connection reset".into())),
        }
    }

    async fn call(&self, _to: Address, _data: Bytes) -> Result<Bytes> {
        let mut word = [0u8; 32];
        word[31] = *self.decimals.lock().unwrap();
        Ok(Bytes::copy_from_slice(&word))
    }
}
