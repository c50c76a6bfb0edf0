//! Tip requests and input validation

use std::str::FromStr;

use alloy_primitives::Address;

use crate::chain::TokenAmount;
use crate::error::{Error, Result};

/// Raw user input for a tip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipRequest {
    /// Recipient address as typed
    pub recipient_address: String,

    /// Amount in whole tokens, as a decimal string
    pub amount_tokens: String,
}

/// A tip that passed input validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTip {
    pub recipient: Address,
    pub amount: TokenAmount,
}

impl TipRequest {
    pub fn new(recipient_address: impl Into<String>, amount_tokens: impl Into<String>) -> Self {
        Self {
            recipient_address: recipient_address.into(),
            amount_tokens: amount_tokens.into(),
        }
    }

    /// Validate recipient and amount, scaling the amount by `decimals`
    pub fn validate(&self, decimals: u8) -> Result<ValidatedTip> {
        let recipient = parse_recipient(&self.recipient_address)?;
        let amount = TokenAmount::parse(&self.amount_tokens, decimals)?;
        Ok(ValidatedTip { recipient, amount })
    }
}

/// Parse a recipient address, requiring the 0x-prefixed 20-byte hex form
pub fn parse_recipient(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyRecipient);
    }
    if !trimmed.starts_with("0x") || trimmed.len() != 42 {
        return Err(Error::InvalidRecipient(trimmed.to_string()));
    }
    Address::from_str(trimmed).map_err(|_| Error::InvalidRecipient(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    const RECIPIENT: &str = "0xABCDEF1234567890ABCDEF1234567890ABCDEF12";

    #[test]
    fn test_valid_request() {
        let tip = TipRequest::new(RECIPIENT, "100").validate(18).unwrap();
        assert_eq!(tip.recipient, Address::from_str(RECIPIENT).unwrap());
        assert_eq!(
            tip.amount.raw(),
            U256::from(100u64) * U256::from(1_000_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_empty_recipient() {
        let err = TipRequest::new("   ", "100").validate(18).unwrap_err();
        assert!(matches!(err, Error::EmptyRecipient));
    }

    #[test]
    fn test_malformed_recipient() {
        for bad in ["alice.eth", "0x1234", "ABCDEF1234567890ABCDEF1234567890ABCDEF1234", "0xZZCDEF1234567890ABCDEF1234567890ABCDEF12"] {
            let err = TipRequest::new(bad, "100").validate(18).unwrap_err();
            assert!(matches!(err, Error::InvalidRecipient(_)), "accepted {}", bad);
        }
    }

    #[test]
    fn test_non_positive_amount() {
        for amount in ["0", "-1", "0.0"] {
            let err = TipRequest::new(RECIPIENT, amount).validate(18).unwrap_err();
            assert!(err.is_input_error());
        }
    }
}
