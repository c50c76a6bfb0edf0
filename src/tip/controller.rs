//! Tip transaction lifecycle controller
//!
//! Validates a tip, hands the transfer to the wallet, and follows it until the
//! network confirms or something fails. Every transition is published twice:
//! the latest state on a watch channel, the full sequence on a broadcast
//! channel.

use std::str::FromStr;
use std::sync::Arc;

use alloy_primitives::Address;
use chrono::Utc;
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::chain::{token, TransferCall};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::network::NetworkGuard;
use crate::wallet::WalletBackend;

use super::request::{TipRequest, ValidatedTip};
use super::state::{FailureReason, TipEvent, TransactionState};

/// Buffered transitions per subscriber before it starts lagging
const EVENT_CAPACITY: usize = 64;

/// Fixed parameters of every tip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipSettings {
    /// Token contract tips are paid in
    pub token: Address,

    /// Decimal precision used to scale amounts
    pub decimals: u8,

    /// Network tips must be sent on
    pub chain_id: u64,

    /// Reject new submissions while one is pending
    pub single_in_flight: bool,
}

impl TipSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        let token = Address::from_str(&config.token.address).map_err(|e| {
            Error::Config(format!("Invalid token address {}: {}", config.token.address, e))
        })?;

        Ok(Self {
            token,
            decimals: config.token.decimals,
            chain_id: config.chain.chain_id,
            single_in_flight: !config.tip.allow_concurrent_tips,
        })
    }
}

/// Drives a tip from submission to confirmation
pub struct TipController {
    wallet: Arc<dyn WalletBackend>,
    guard: NetworkGuard,
    settings: TipSettings,
    state: watch::Sender<TransactionState>,
    events: broadcast::Sender<TipEvent>,
}

impl TipController {
    pub fn new(wallet: Arc<dyn WalletBackend>, settings: TipSettings) -> Self {
        let guard = NetworkGuard::new(wallet.clone(), settings.chain_id);
        let (state, _) = watch::channel(TransactionState::Idle);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            wallet,
            guard,
            settings,
            state,
            events,
        }
    }

    pub fn settings(&self) -> &TipSettings {
        &self.settings
    }

    pub fn guard(&self) -> &NetworkGuard {
        &self.guard
    }

    /// Latest state
    pub fn state(&self) -> TransactionState {
        self.state.borrow().clone()
    }

    /// Receiver that always holds the latest state
    pub fn watch_state(&self) -> watch::Receiver<TransactionState> {
        self.state.subscribe()
    }

    /// Receiver for every transition from now on
    pub fn subscribe(&self) -> broadcast::Receiver<TipEvent> {
        self.events.subscribe()
    }

    /// Transitions from now on as a stream
    ///
    /// Ends when the controller is dropped. A subscriber that falls more than
    /// `EVENT_CAPACITY` transitions behind skips the oldest ones.
    pub fn states(&self) -> impl Stream<Item = TipEvent> + Send + 'static {
        futures::stream::unfold(self.events.subscribe(), |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => return Some((event, rx)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Tip state subscriber lagged");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
    }

    /// Go back to `Idle` unless a tip is still pending
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            if state.is_pending() || *state == TransactionState::Idle {
                false
            } else {
                *state = TransactionState::Idle;
                true
            }
        });
    }

    /// Check every precondition without touching state
    ///
    /// A wrong network additionally fires a switch request.
    pub fn preflight(&self, request: &TipRequest) -> Result<ValidatedTip> {
        let session = self.wallet.session();
        if !session.is_connected {
            return Err(Error::NotConnected);
        }

        let tip = request.validate(self.settings.decimals)?;

        self.guard
            .ensure_network(session.connected_network_id)
            .into_result()?;

        Ok(tip)
    }

    /// Submit a tip and follow it to a terminal state
    ///
    /// Precondition failures come back as `Err` with no state change and no
    /// wallet call. Once submitted, wallet and network failures end in
    /// `Ok(TransactionState::Failed(_))`.
    pub async fn submit_tip(&self, request: &TipRequest) -> Result<TransactionState> {
        let tip = self.preflight(request)?;
        let tip_id = Uuid::new_v4();

        if self.settings.single_in_flight {
            let claimed = self.state.send_if_modified(|state| {
                if state.is_pending() {
                    false
                } else {
                    *state = TransactionState::AwaitingWalletApproval;
                    true
                }
            });
            if !claimed {
                warn!(%tip_id, "Tip rejected, another one is still pending");
                return Err(Error::TipInFlight);
            }
            self.emit(tip_id, TransactionState::AwaitingWalletApproval);
        } else {
            self.publish(tip_id, TransactionState::AwaitingWalletApproval);
        }

        let call = TransferCall::new(
            self.settings.token,
            tip.recipient,
            &tip.amount,
            self.settings.chain_id,
        );

        info!(
            %tip_id,
            to = %tip.recipient,
            amount = %tip.amount,
            "Submitting tip for wallet approval"
        );

        let tx_hash = match self.wallet.submit_transfer(&call).await {
            Ok(hash) => hash,
            Err(e) => return Ok(self.fail(tip_id, &e)),
        };

        self.publish(tip_id, TransactionState::Confirming { tx_hash });
        info!(%tip_id, %tx_hash, "Tip broadcast, waiting for confirmation");

        let state = match self.wallet.await_confirmation(tx_hash).await {
            Ok(receipt) if receipt.success => TransactionState::Confirmed {
                tx_hash: receipt.tx_hash,
                block_number: receipt.block_number,
            },
            Ok(receipt) => {
                return Ok(self.fail(tip_id, &Error::Reverted(receipt.tx_hash.to_string())));
            }
            Err(e) => return Ok(self.fail(tip_id, &e)),
        };

        info!(%tip_id, %tx_hash, "Tip confirmed");
        self.publish(tip_id, state.clone());
        Ok(state)
    }

    /// Compare the configured decimals with what the token contract reports
    pub async fn verify_token_decimals(&self) -> Result<u8> {
        let data = self
            .wallet
            .call(self.settings.token, token::decimals_calldata())
            .await?;
        let onchain = token::decode_decimals(&data)?;

        if onchain != self.settings.decimals {
            return Err(Error::Config(format!(
                "Token reports {} decimals but {} are configured",
                onchain, self.settings.decimals
            )));
        }
        Ok(onchain)
    }

    fn fail(&self, tip_id: Uuid, error: &Error) -> TransactionState {
        let reason = FailureReason::from_error(error);
        error!(%tip_id, kind = %reason.kind, "Tip failed: {}", reason.detail);

        let state = TransactionState::Failed(reason);
        self.publish(tip_id, state.clone());
        state
    }

    fn publish(&self, tip_id: Uuid, state: TransactionState) {
        self.state.send_replace(state.clone());
        self.emit(tip_id, state);
    }

    fn emit(&self, tip_id: Uuid, state: TransactionState) {
        // No subscribers is fine
        let _ = self.events.send(TipEvent {
            tip_id,
            state,
            at: Utc::now(),
        });
    }
}
