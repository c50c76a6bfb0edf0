//! ERC-20 transfer encoding and decimal scaling

use std::fmt;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use crate::error::{Error, Result};

sol! {
    /// The slice of the ERC-20 interface the tipper touches
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function decimals() external view returns (uint8);
    }
}

/// Largest decimal precision whose scale factor still fits a U256
pub const MAX_DECIMALS: u8 = 77;

/// A token amount held in the token's native integer unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
}

impl TokenAmount {
    /// Parse a human decimal ("100", "2.5") and scale it by `decimals`
    ///
    /// Zero and negative amounts are rejected with `NonPositiveAmount`.
    /// More fractional digits than the token supports is an `InvalidAmount`.
    pub fn parse(input: &str, decimals: u8) -> Result<Self> {
        if decimals > MAX_DECIMALS {
            return Err(Error::Config(format!(
                "token decimals {} exceeds maximum {}",
                decimals, MAX_DECIMALS
            )));
        }

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidAmount("amount is empty".to_string()));
        }
        if trimmed.starts_with('-') {
            return Err(Error::NonPositiveAmount);
        }
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(Error::InvalidAmount(input.to_string()));
        }
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(Error::InvalidAmount(input.to_string()));
        }
        if frac_part.len() > decimals as usize {
            return Err(Error::InvalidAmount(format!(
                "{} has more than {} decimal places",
                input, decimals
            )));
        }

        let mut digits = String::with_capacity(int_part.len() + decimals as usize);
        digits.push_str(int_part);
        digits.push_str(frac_part);
        digits.extend(std::iter::repeat('0').take(decimals as usize - frac_part.len()));

        let significant = digits.trim_start_matches('0');
        if significant.is_empty() {
            return Err(Error::NonPositiveAmount);
        }

        let raw = U256::from_str_radix(significant, 10)
            .map_err(|_| Error::InvalidAmount(format!("{} is too large", input)))?;

        Ok(Self { raw, decimals })
    }

    /// Wrap an amount already expressed in native units
    pub fn from_raw(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Amount in the token's native integer unit
    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.raw.to_string();
        let decimals = self.decimals as usize;
        if decimals == 0 {
            return write!(f, "{}", digits);
        }

        let padded = format!("{:0>width$}", digits, width = decimals + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        let frac_part = frac_part.trim_end_matches('0');

        if frac_part.is_empty() {
            write!(f, "{}", int_part)
        } else {
            write!(f, "{}.{}", int_part, frac_part)
        }
    }
}

/// A token transfer ready to hand to the wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCall {
    /// Token contract the call is sent to
    pub token: Address,
    /// Recipient of the tokens
    pub to: Address,
    /// Amount in native units
    pub amount: U256,
    /// Network the call must be executed on
    pub chain_id: u64,
}

impl TransferCall {
    pub fn new(token: Address, to: Address, amount: &TokenAmount, chain_id: u64) -> Self {
        Self {
            token,
            to,
            amount: amount.raw(),
            chain_id,
        }
    }

    /// ABI-encoded `transfer(to, amount)` calldata
    pub fn calldata(&self) -> Bytes {
        IERC20::transferCall {
            to: self.to,
            amount: self.amount,
        }
        .abi_encode()
        .into()
    }
}

/// Calldata for the read-only `decimals()` query
pub fn decimals_calldata() -> Bytes {
    IERC20::decimalsCall {}.abi_encode().into()
}

/// Decode the return data of `decimals()`
pub fn decode_decimals(data: &[u8]) -> Result<u8> {
    IERC20::decimalsCall::abi_decode_returns(data, true)
        .map(|ret| ret._0)
        .map_err(|e| Error::Rpc(format!("Failed to decode decimals(): {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn one_token() -> U256 {
        U256::from(1_000_000_000_000_000_000u128)
    }

    #[test]
    fn test_parse_whole_and_fractional() {
        let amount = TokenAmount::parse("100", 18).unwrap();
        assert_eq!(amount.raw(), U256::from(100u64) * one_token());

        let amount = TokenAmount::parse("2.5", 18).unwrap();
        assert_eq!(amount.raw(), U256::from(2_500_000_000_000_000_000u128));

        let amount = TokenAmount::parse(".5", 2).unwrap();
        assert_eq!(amount.raw(), U256::from(50u64));
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        assert!(matches!(TokenAmount::parse("0", 18), Err(Error::NonPositiveAmount)));
        assert!(matches!(TokenAmount::parse("0.000", 18), Err(Error::NonPositiveAmount)));
        assert!(matches!(TokenAmount::parse("-5", 18), Err(Error::NonPositiveAmount)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(TokenAmount::parse("", 18), Err(Error::InvalidAmount(_))));
        assert!(matches!(TokenAmount::parse("abc", 18), Err(Error::InvalidAmount(_))));
        assert!(matches!(TokenAmount::parse("1.2.3", 18), Err(Error::InvalidAmount(_))));
        assert!(matches!(TokenAmount::parse(".", 18), Err(Error::InvalidAmount(_))));
        assert!(matches!(TokenAmount::parse("1e18", 18), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn test_parse_respects_decimals() {
        assert!(matches!(TokenAmount::parse("1.001", 2), Err(Error::InvalidAmount(_))));
        assert_eq!(TokenAmount::parse("7", 6).unwrap().raw(), U256::from(7_000_000u64));
        assert!(matches!(TokenAmount::parse("1", 78), Err(Error::Config(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenAmount::parse("100", 18).unwrap().to_string(), "100");
        assert_eq!(TokenAmount::parse("2.50", 18).unwrap().to_string(), "2.5");
        assert_eq!(TokenAmount::parse("0.001", 18).unwrap().to_string(), "0.001");
        assert_eq!(TokenAmount::from_raw(U256::from(42u64), 0).to_string(), "42");
    }

    #[test]
    fn test_transfer_calldata_layout() {
        let token = Address::from_str(crate::chain::DEGEN_TOKEN_ADDRESS).unwrap();
        let to = Address::from_str("0xABCDEF1234567890ABCDEF1234567890ABCDEF12").unwrap();
        let amount = TokenAmount::parse("250", 18).unwrap();

        let call = TransferCall::new(token, to, &amount, crate::chain::BASE_CHAIN_ID);
        let data = call.calldata();

        assert_eq!(data.len(), 4 + 32 + 32);
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        assert!(data[4..16].iter().all(|b| *b == 0));
        assert_eq!(&data[16..36], to.as_slice());
        assert_eq!(&data[36..68], &amount.raw().to_be_bytes::<32>());
    }

    #[test]
    fn test_decimals_round_trip_through_abi() {
        assert_eq!(&decimals_calldata()[..], &[0x31, 0x3c, 0xe5, 0x67]);

        let mut word = [0u8; 32];
        word[31] = 18;
        assert_eq!(decode_decimals(&word).unwrap(), 18);
    }
}
