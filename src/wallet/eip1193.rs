//! EIP-1193 JSON-RPC wallet backend
//!
//! Talks to any wallet that exposes the EIP-1193 request surface over HTTP:
//! desktop wallets with a local RPC port, or a dev node with unlocked
//! accounts. Receipts are polled, never pushed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{hex, Address, Bytes, TxHash};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::chain::{parse_hex_u64, to_hex_quantity, TransferCall};
use crate::config::WalletConfig;
use crate::error::{Error, Result};

use super::backend::WalletBackend;
use super::types::{ConnectorInfo, TransactionReceipt, WalletSession};

/// EIP-1193 error code for "user rejected the request"
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC error code for "method not found"
const METHOD_NOT_FOUND_CODE: i64 = -32601;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl RpcReceipt {
    fn into_receipt(self) -> Result<TransactionReceipt> {
        let block_number = self.block_number.as_deref().map(parse_hex_u64).transpose()?;
        // Receipts without a status field predate Byzantium and cannot revert-flag
        let success = self.status.as_deref().map_or(true, |s| s == "0x1");

        Ok(TransactionReceipt {
            tx_hash: self.transaction_hash,
            block_number,
            success,
        })
    }
}

struct Inner {
    http: reqwest::Client,
    connectors: Vec<ConnectorInfo>,
    session: watch::Sender<WalletSession>,
    next_id: AtomicU64,
    receipt_poll_interval: Duration,
}

/// Wallet backend speaking EIP-1193 over HTTP
#[derive(Clone)]
pub struct Eip1193Wallet {
    inner: Arc<Inner>,
}

impl Eip1193Wallet {
    /// Build a backend from the wallet configuration
    ///
    /// Connectors not named in `allowed_connectors` are hidden. An empty
    /// allow-list keeps every configured connector.
    pub fn new(config: &WalletConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let connectors: Vec<ConnectorInfo> = config
            .connectors
            .iter()
            .filter(|c| {
                config.allowed_connectors.is_empty()
                    || config.allowed_connectors.iter().any(|name| name == &c.name)
            })
            .cloned()
            .collect();

        if connectors.is_empty() {
            warn!("No wallet connectors available after applying allow-list");
        }

        let (session, _) = watch::channel(WalletSession::disconnected());

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                connectors,
                session,
                next_id: AtomicU64::new(1),
                receipt_poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
            }),
        })
    }

    fn connector(&self, connector_id: &str) -> Result<&ConnectorInfo> {
        self.inner
            .connectors
            .iter()
            .find(|c| c.id == connector_id)
            .ok_or_else(|| Error::UnknownConnector(connector_id.to_string()))
    }

    /// RPC endpoint and account of the live session
    fn active(&self) -> Result<(String, Address)> {
        let session = self.session();
        let (Some(connector_id), Some(address)) = (session.connector_id, session.address) else {
            return Err(Error::NotConnected);
        };
        let url = self.connector(&connector_id)?.rpc_url.clone();
        Ok((url, address))
    }

    async fn request<T: DeserializeOwned>(&self, url: &str, method: &str, params: Value) -> Result<T> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method, id, "Wallet request");

        let response: RpcResponse = self
            .inner
            .http
            .post(url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            if err.code == USER_REJECTED_CODE {
                return Err(Error::UserRejected(err.message));
            }
            return Err(Error::RpcResponse {
                code: err.code,
                message: err.message,
            });
        }

        Ok(serde_json::from_value(response.result.unwrap_or(Value::Null))?)
    }

    async fn request_accounts(&self, url: &str) -> Result<Vec<Address>> {
        match self.request(url, "eth_requestAccounts", json!([])).await {
            Err(Error::RpcResponse { code, .. }) if code == METHOD_NOT_FOUND_CODE => {
                debug!("eth_requestAccounts unsupported, falling back to eth_accounts");
                self.request(url, "eth_accounts", json!([])).await
            }
            other => other,
        }
    }

    async fn chain_id(&self, url: &str) -> Result<u64> {
        let chain: String = self.request(url, "eth_chainId", json!([])).await?;
        parse_hex_u64(&chain)
    }
}

#[async_trait]
impl WalletBackend for Eip1193Wallet {
    fn connectors(&self) -> Vec<ConnectorInfo> {
        self.inner.connectors.clone()
    }

    async fn connect(&self, connector_id: &str, chain_id: Option<u64>) -> Result<WalletSession> {
        let connector = self.connector(connector_id)?.clone();
        info!(connector = %connector.name, "Connecting wallet");

        let accounts = self.request_accounts(&connector.rpc_url).await?;
        let address = accounts
            .first()
            .copied()
            .ok_or_else(|| Error::Wallet(format!("{} returned no accounts", connector.name)))?;
        let current = self.chain_id(&connector.rpc_url).await?;

        self.inner
            .session
            .send_replace(WalletSession::connected(&connector.id, address, current));
        info!(%address, chain_id = current, "Wallet connected");

        if let Some(wanted) = chain_id {
            if wanted != current {
                if let Err(e) = self.switch_network(wanted).await {
                    warn!(wanted, "Connected on chain {} and could not switch: {}", current, e);
                }
            }
        }

        Ok(self.session())
    }

    async fn disconnect(&self) -> Result<()> {
        self.inner.session.send_replace(WalletSession::disconnected());
        info!("Wallet disconnected");
        Ok(())
    }

    fn session(&self) -> WalletSession {
        self.inner.session.borrow().clone()
    }

    fn subscribe_session(&self) -> watch::Receiver<WalletSession> {
        self.inner.session.subscribe()
    }

    fn request_network_switch(&self, chain_id: u64) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(chain_id, "No async runtime, dropping network switch request");
            return;
        };

        let wallet = self.clone();
        runtime.spawn(async move {
            if let Err(e) = wallet.switch_network(chain_id).await {
                warn!(chain_id, "Network switch request failed: {}", e);
            }
        });
    }

    async fn switch_network(&self, chain_id: u64) -> Result<()> {
        let (url, _) = self.active()?;
        info!(chain_id, "Requesting network switch");

        let _: Value = self
            .request(
                &url,
                "wallet_switchEthereumChain",
                json!([{ "chainId": to_hex_quantity(chain_id) }]),
            )
            .await?;

        let current = self.chain_id(&url).await?;
        self.inner.session.send_modify(|session| {
            session.connected_network_id = Some(current);
        });

        if current != chain_id {
            return Err(Error::Wallet(format!(
                "Wallet still on chain {} after switching to {}",
                current, chain_id
            )));
        }

        info!(chain_id, "Network switched");
        Ok(())
    }

    async fn submit_transfer(&self, call: &TransferCall) -> Result<TxHash> {
        let (url, from) = self.active()?;

        let tx = json!({
            "from": from.to_string(),
            "to": call.token.to_string(),
            "data": hex::encode_prefixed(call.calldata()),
            "value": "0x0",
            "chainId": to_hex_quantity(call.chain_id),
        });

        let tx_hash: TxHash = self.request(&url, "eth_sendTransaction", json!([tx])).await?;
        info!(%tx_hash, "Transfer broadcast");
        Ok(tx_hash)
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<TransactionReceipt> {
        let (url, _) = self.active()?;
        let hash = hex::encode_prefixed(tx_hash);

        loop {
            let receipt: Option<RpcReceipt> = match self
                .request(&url, "eth_getTransactionReceipt", json!([hash]))
                .await
            {
                Ok(receipt) => receipt,
                // Transport hiccup; the transaction is already out, keep polling
                Err(Error::Rpc(e)) => {
                    warn!(%tx_hash, "Receipt lookup failed, retrying: {}", e);
                    tokio::time::sleep(self.inner.receipt_poll_interval).await;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some(receipt) = receipt {
                let receipt = receipt.into_receipt()?;
                debug!(%tx_hash, block = ?receipt.block_number, "Receipt received");
                return Ok(receipt);
            }

            debug!(%tx_hash, "Receipt pending");
            tokio::time::sleep(self.inner.receipt_poll_interval).await;
        }
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let (url, _) = self.active()?;
        self.request(
            &url,
            "eth_call",
            json!([{ "to": to.to_string(), "data": hex::encode_prefixed(&data) }, "latest"]),
        )
        .await
    }
}
