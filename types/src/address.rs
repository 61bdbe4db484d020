//! Account address type, written as `0x`-prefixed hex.

use crate::error::AddressError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account address.
///
/// The all-zero address is an ordinary value here. "No address supplied" is
/// expressed with `Option<&Address>` at the API boundary, never with a zero value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// Number of hex characters in the textual form (without prefix).
    pub const HEX_LEN: usize = 40;

    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != Self::HEX_LEN {
            return Err(AddressError::InvalidLength {
                expected: Self::HEX_LEN,
                got: digits.len(),
            });
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0x00000000000000000000000000000000000000a1";

    #[test]
    fn parses_prefixed_and_bare_hex() {
        let prefixed: Address = SAMPLE.parse().unwrap();
        let bare: Address = SAMPLE.trim_start_matches("0x").parse().unwrap();
        assert_eq!(prefixed, bare);
        assert_eq!(prefixed.as_bytes()[19], 0xa1);
    }

    #[test]
    fn display_round_trips() {
        let address: Address = SAMPLE.parse().unwrap();
        assert_eq!(address.to_string(), SAMPLE);
    }

    #[test]
    fn mixed_case_is_accepted() {
        let address: Address = "0xABCDEFabcdef0000000000000000000000000000".parse().unwrap();
        assert_eq!(address.as_bytes()[0], 0xab);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert_eq!(
            err,
            AddressError::InvalidLength {
                expected: 40,
                got: 4
            }
        );
    }

    #[test]
    fn non_hex_is_rejected() {
        let err = "0xzz00000000000000000000000000000000000000"
            .parse::<Address>()
            .unwrap_err();
        assert!(matches!(err, AddressError::InvalidHex(_)));
    }

    #[test]
    fn zero_address_is_a_regular_value() {
        let zero: Address = "0x0000000000000000000000000000000000000000".parse().unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero, Address::ZERO);
    }
}
