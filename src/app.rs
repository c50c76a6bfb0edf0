//! Application state holder
//!
//! Owns everything a tipping session needs and exposes it through named
//! mutations and derived views. Nothing here is global.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::TxHash;
use tracing::{debug, info};

use crate::chain::explorer_tx_url;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::frame::FrameContext;
use crate::network::NetworkCheck;
use crate::onboarding::{FlagStore, OnboardingFlow};
use crate::profile::{format_address_long, ProfilePresenter, UserProfile};
use crate::tip::{TipController, TipRequest, TipSettings, TransactionState};
use crate::wallet::WalletBackend;

/// What the tip form currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipForm {
    pub recipient: String,
    pub amount: String,
}

/// The send button, derived from session, form and transaction state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipButton {
    Confirmed,
    Confirming,
    AwaitingApproval,
    ConnectWallet,
    SwitchNetwork { network: String },
    EnterRecipient,
    Send { amount: String, symbol: String },
}

impl TipButton {
    /// Whether pressing the button submits a tip
    pub fn is_enabled(&self) -> bool {
        matches!(self, TipButton::Send { .. } | TipButton::Confirmed)
    }
}

impl fmt::Display for TipButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TipButton::Confirmed => write!(f, "Tip Sent Successfully!"),
            TipButton::Confirming => write!(f, "Confirming..."),
            TipButton::AwaitingApproval => write!(f, "Approve in Wallet..."),
            TipButton::ConnectWallet => write!(f, "Connect Wallet to Send Tips"),
            TipButton::SwitchNetwork { network } => write!(f, "Switch to {} Network", network),
            TipButton::EnterRecipient => write!(f, "Enter Recipient Address"),
            TipButton::Send { amount, symbol } => write!(f, "✨ Send {} ${}", amount, symbol),
        }
    }
}

pub struct TipperApp {
    wallet: Arc<dyn WalletBackend>,
    controller: TipController,
    onboarding: OnboardingFlow,
    presenter: ProfilePresenter,
    frame_context: FrameContext,
    form: TipForm,
    presets: Vec<u64>,
    network_name: String,
    token_symbol: String,
    explorer_url: String,
    last_tx_hash: Option<TxHash>,
}

impl TipperApp {
    pub fn new(
        config: &Config,
        wallet: Arc<dyn WalletBackend>,
        flags: Arc<dyn FlagStore>,
    ) -> Result<Self> {
        let settings = TipSettings::from_config(config)?;
        let controller = TipController::new(wallet.clone(), settings);
        let onboarding = OnboardingFlow::start(flags)?;
        let presenter = ProfilePresenter::new(&config.profile.avatar_service_url)?;

        Ok(Self {
            wallet,
            controller,
            onboarding,
            presenter,
            frame_context: FrameContext::default(),
            form: TipForm {
                recipient: String::new(),
                amount: config.tip.default_amount.clone(),
            },
            presets: config.tip.preset_amounts.clone(),
            network_name: config.chain.name.clone(),
            token_symbol: config.token.symbol.clone(),
            explorer_url: config.chain.explorer_url.clone(),
            last_tx_hash: None,
        })
    }

    pub fn controller(&self) -> &TipController {
        &self.controller
    }

    pub fn wallet(&self) -> &Arc<dyn WalletBackend> {
        &self.wallet
    }

    pub fn form(&self) -> &TipForm {
        &self.form
    }

    pub fn presets(&self) -> &[u64] {
        &self.presets
    }

    pub fn onboarding(&self) -> &OnboardingFlow {
        &self.onboarding
    }

    pub fn onboarding_mut(&mut self) -> &mut OnboardingFlow {
        &mut self.onboarding
    }

    pub fn set_frame_context(&mut self, context: FrameContext) {
        debug!(fid = ?context.fid(), "Frame context set");
        self.frame_context = context;
    }

    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.form.recipient = recipient.into();
    }

    /// Free-form amount; validated only on submission
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.form.amount = amount.into();
    }

    /// Pick one of the configured preset amounts
    pub fn select_preset(&mut self, amount: u64) -> Result<()> {
        if !self.presets.contains(&amount) {
            return Err(Error::InvalidAmount(format!("{} is not a preset", amount)));
        }
        self.form.amount = amount.to_string();
        Ok(())
    }

    /// React to a new wallet session: nudge the wallet onto the target network
    pub fn on_session_changed(&self) -> NetworkCheck {
        self.controller.guard().ensure_session_network()
    }

    /// Submit the form as a tip
    pub async fn handle_tip(&mut self) -> Result<TransactionState> {
        let request = TipRequest::new(self.form.recipient.clone(), self.form.amount.clone());

        // The hash only lives in the intermediate states, catch it there
        let mut events = self.controller.subscribe();
        let result = self.controller.submit_tip(&request).await;
        while let Ok(event) = events.try_recv() {
            // Approval is only requested once preflight passed, so a blocked
            // submission keeps the previous link
            if event.state == TransactionState::AwaitingWalletApproval {
                self.last_tx_hash = None;
            }
            if let Some(hash) = event.state.tx_hash() {
                self.last_tx_hash = Some(hash);
            }
        }

        let state = result?;
        info!(state = %state, "Tip finished");
        Ok(state)
    }

    /// Drop the wallet session
    pub async fn disconnect(&self) -> Result<()> {
        self.wallet.disconnect().await
    }

    /// Profile of the connected user, if any
    pub fn profile(&self) -> Option<UserProfile> {
        let address = self.wallet.session().address_string()?;
        Some(self.presenter.derive(&address, self.frame_context.username()))
    }

    /// Secondary address line, shown only when there is no username
    pub fn address_line(&self) -> Option<String> {
        let profile = self.profile()?;
        match profile.username {
            Some(_) => None,
            None => Some(format_address_long(&profile.address)),
        }
    }

    pub fn tip_button(&self) -> TipButton {
        match self.controller.state() {
            TransactionState::Confirmed { .. } => return TipButton::Confirmed,
            TransactionState::Confirming { .. } => return TipButton::Confirming,
            TransactionState::AwaitingWalletApproval => return TipButton::AwaitingApproval,
            _ => {}
        }

        let session = self.wallet.session();
        if !session.is_connected {
            return TipButton::ConnectWallet;
        }
        if !session.is_on_network(self.controller.settings().chain_id) {
            return TipButton::SwitchNetwork {
                network: self.network_name.clone(),
            };
        }
        if self.form.recipient.trim().is_empty() {
            return TipButton::EnterRecipient;
        }
        TipButton::Send {
            amount: self.form.amount.clone(),
            symbol: self.token_symbol.clone(),
        }
    }

    pub fn last_tx_hash(&self) -> Option<TxHash> {
        self.last_tx_hash
    }

    /// Explorer link for the latest transaction hash
    pub fn explorer_link(&self) -> Option<String> {
        self.last_tx_hash
            .map(|hash| explorer_tx_url(&self.explorer_url, &hash.to_string()))
    }
}
