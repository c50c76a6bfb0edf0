//! Error types for the tipper

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the tipper
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // User input errors
    #[error("Please enter recipient address")]
    EmptyRecipient,

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Invalid tip amount: {0}")]
    InvalidAmount(String),

    #[error("Tip amount must be greater than zero")]
    NonPositiveAmount,

    // Session errors
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Please switch to network {target} (connected to {current})")]
    WrongNetwork { current: u64, target: u64 },

    #[error("Unknown wallet connector: {0}")]
    UnknownConnector(String),

    #[error("A tip is already in flight")]
    TipInFlight,

    // Wallet errors
    #[error("Request rejected in wallet: {0}")]
    UserRejected(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    // Network errors
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("RPC error {code}: {message}")]
    RpcResponse { code: i64, message: String },

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    // Onboarding errors
    #[error("Back is unavailable on the first onboarding step")]
    BackUnavailable,

    #[error("Onboarding already completed")]
    OnboardingCompleted,

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Check if this error comes from user input (blocks submission, no state change)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyRecipient
                | Error::InvalidRecipient(_)
                | Error::InvalidAmount(_)
                | Error::NonPositiveAmount
        )
    }

    /// Check if this error comes from the wallet session state
    pub fn is_session_error(&self) -> bool {
        matches!(
            self,
            Error::NotConnected
                | Error::WrongNetwork { .. }
                | Error::UnknownConnector(_)
                | Error::TipInFlight
        )
    }
}

// Conversion from reqwest errors
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Rpc(e.to_string())
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

// Conversion from I/O errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
