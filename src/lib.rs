//! Karma Tipper Library
//!
//! Send ERC-20 tips through an EIP-1193 wallet, with a network guard,
//! first-run onboarding, and the frame host descriptors.

pub mod app;
pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod network;
pub mod onboarding;
pub mod profile;
pub mod tip;
pub mod wallet;

// Re-export commonly used types
pub use app::TipperApp;
pub use config::Config;
pub use error::{Error, Result};
