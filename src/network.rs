//! Network guard
//!
//! Blocks submission until the wallet reports the target network, and nudges
//! the wallet toward it when it is somewhere else.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::wallet::WalletBackend;

/// Outcome of a network check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkCheck {
    /// Wallet is on the target network
    Ok,
    /// Wallet is elsewhere; a switch was requested
    SwitchRequested { current: u64, target: u64 },
    /// No network reported; nothing was requested
    NotConnected,
}

impl NetworkCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, NetworkCheck::Ok)
    }

    /// Convert a blocked check into the matching session error
    pub fn into_result(self) -> Result<()> {
        match self {
            NetworkCheck::Ok => Ok(()),
            NetworkCheck::SwitchRequested { current, target } => {
                Err(Error::WrongNetwork { current, target })
            }
            NetworkCheck::NotConnected => Err(Error::NotConnected),
        }
    }
}

/// Keeps the wallet on the target network
pub struct NetworkGuard {
    wallet: Arc<dyn WalletBackend>,
    target: u64,
}

impl NetworkGuard {
    pub fn new(wallet: Arc<dyn WalletBackend>, target: u64) -> Self {
        Self { wallet, target }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Check `current` against the target, requesting a switch on mismatch
    ///
    /// The switch request is fire-and-forget: the guard reports blocked and
    /// relies on the session to report the new network later.
    pub fn ensure_network(&self, current: Option<u64>) -> NetworkCheck {
        match current {
            None => NetworkCheck::NotConnected,
            Some(current) if current == self.target => NetworkCheck::Ok,
            Some(current) => {
                warn!(current, target = self.target, "Wrong network, requesting switch");
                self.wallet.request_network_switch(self.target);
                NetworkCheck::SwitchRequested {
                    current,
                    target: self.target,
                }
            }
        }
    }

    /// Check the wallet's own session
    pub fn ensure_session_network(&self) -> NetworkCheck {
        let session = self.wallet.session();
        if !session.is_connected {
            return NetworkCheck::NotConnected;
        }
        let check = self.ensure_network(session.connected_network_id);
        if check.is_ok() {
            info!(chain_id = self.target, "Wallet on target network");
        }
        check
    }
}
