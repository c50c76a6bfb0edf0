//! Chain identifiers and ERC-20 encoding
//!
//! Everything the tipper needs to know about the target network and the
//! tipped token lives here. Defaults point at DEGEN on Base.

pub mod token;

pub use token::{TokenAmount, TransferCall, IERC20, MAX_DECIMALS};

use crate::error::{Error, Result};

/// Base mainnet chain id
pub const BASE_CHAIN_ID: u64 = 8453;

/// DEGEN token contract on Base
pub const DEGEN_TOKEN_ADDRESS: &str = "0x4ed4E862860beD51a9570b96d89aF5E1B0Efefed";

/// Decimal precision of the DEGEN token
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Block explorer for Base
pub const BASESCAN_URL: &str = "https://basescan.org";

/// Parse a hex quantity (`0x2105`) as returned by `eth_chainId` and friends
pub fn parse_hex_u64(value: &str) -> Result<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| Error::Rpc(format!("Expected hex quantity, got {}", value)))?;

    u64::from_str_radix(digits, 16)
        .map_err(|e| Error::Rpc(format!("Invalid hex quantity {}: {}", value, e)))
}

/// Format a chain id as the hex quantity wallets expect
pub fn to_hex_quantity(value: u64) -> String {
    format!("{:#x}", value)
}

/// Explorer link for a transaction hash
pub fn explorer_tx_url(explorer_base: &str, tx_hash: &str) -> String {
    format!("{}/tx/{}", explorer_base.trim_end_matches('/'), tx_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("0x2105").unwrap(), BASE_CHAIN_ID);
        assert_eq!(parse_hex_u64("0xa").unwrap(), 10);
        assert!(parse_hex_u64("8453").is_err());
        assert!(parse_hex_u64("0xzz").is_err());
    }

    #[test]
    fn test_to_hex_quantity() {
        assert_eq!(to_hex_quantity(BASE_CHAIN_ID), "0x2105");
    }

    #[test]
    fn test_explorer_tx_url() {
        assert_eq!(
            explorer_tx_url("https://basescan.org/", "0xabc"),
            "https://basescan.org/tx/0xabc"
        );
    }
}
