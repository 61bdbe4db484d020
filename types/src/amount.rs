//! Governance token amount type.
//!
//! Amounts are fixed-point integers: whole wei (10^-18 MKR, the token's smallest
//! indivisible unit) plus a sub-wei remainder carrying nine further decimal digits.
//! The remainder lets a caller-supplied amount keep its full precision through
//! validation; it is dropped only when the amount is converted for submission
//! (see [`MkrAmount::to_wei_truncated`]).

use crate::error::AmountError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places of one wei.
pub const WEI_DECIMALS: usize = 18;

/// Extra decimal places kept below one wei.
pub const SUB_WEI_DECIMALS: usize = 9;

/// Maximum fractional digits accepted when parsing.
pub const MAX_FRACTION_DIGITS: usize = WEI_DECIMALS + SUB_WEI_DECIMALS;

/// Raw units in one whole MKR.
pub const WEI_PER_MKR: u128 = 1_000_000_000_000_000_000;

const SUB_WEI_PER_WEI: u32 = 1_000_000_000;

/// MKR amount — the governance token staked against the shutdown contract.
///
/// Field order matters: the derived ordering compares `wei` first, then the
/// sub-wei remainder, which is exactly numeric order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MkrAmount {
    wei: u128,
    sub_wei: u32,
}

impl MkrAmount {
    pub const ZERO: Self = Self { wei: 0, sub_wei: 0 };

    /// Amount from a raw 18-decimal integer as it comes off the chain.
    pub fn from_wei(wei: u128) -> Self {
        Self { wei, sub_wei: 0 }
    }

    /// Amount from whole tokens. Returns `None` on overflow.
    pub fn from_mkr(mkr: u128) -> Option<Self> {
        mkr.checked_mul(WEI_PER_MKR).map(Self::from_wei)
    }

    /// Amount from wei plus a sub-wei remainder in units of 10^-27 MKR.
    ///
    /// Returns `None` if the remainder is not below one wei.
    pub fn from_parts(wei: u128, sub_wei: u32) -> Option<Self> {
        (sub_wei < SUB_WEI_PER_WEI).then_some(Self { wei, sub_wei })
    }

    /// Raw integer for chain submission. Sub-wei precision is truncated, never rounded up.
    pub fn to_wei_truncated(&self) -> u128 {
        self.wei
    }

    /// The sub-wei remainder that truncation would drop.
    pub fn sub_wei(&self) -> u32 {
        self.sub_wei
    }

    pub fn is_zero(&self) -> bool {
        self.wei == 0 && self.sub_wei == 0
    }

    /// Whether the amount is representable on chain without truncation.
    pub fn is_whole_wei(&self) -> bool {
        self.sub_wei == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        let mut sub_wei = self.sub_wei + other.sub_wei;
        let mut carry = 0;
        if sub_wei >= SUB_WEI_PER_WEI {
            sub_wei -= SUB_WEI_PER_WEI;
            carry = 1;
        }
        let wei = self.wei.checked_add(other.wei)?.checked_add(carry)?;
        Some(Self { wei, sub_wei })
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        let (sub_wei, borrow) = if self.sub_wei >= other.sub_wei {
            (self.sub_wei - other.sub_wei, 0)
        } else {
            (self.sub_wei + SUB_WEI_PER_WEI - other.sub_wei, 1)
        };
        let wei = self.wei.checked_sub(other.wei)?.checked_sub(borrow)?;
        Some(Self { wei, sub_wei })
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        self.checked_sub(other).unwrap_or(Self::ZERO)
    }

    /// Normalized decimal form without unit: no trailing fractional zeros,
    /// no decimal point for whole amounts.
    pub fn to_decimal_string(&self) -> String {
        let whole = self.wei / WEI_PER_MKR;
        let fraction = format!(
            "{:0w$}{:0s$}",
            self.wei % WEI_PER_MKR,
            self.sub_wei,
            w = WEI_DECIMALS,
            s = SUB_WEI_DECIMALS
        );
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{fraction}")
        }
    }
}

impl FromStr for MkrAmount {
    type Err = AmountError;

    /// Parse a decimal string such as `"50000"`, `"0.5"` or `"1.25 MKR"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_suffix("MKR")
            .map(str::trim_end)
            .unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative(trimmed.to_string()));
        }

        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(AmountError::Invalid(trimmed.to_string()));
        }
        if fraction.len() > MAX_FRACTION_DIGITS {
            return Err(AmountError::TooPrecise {
                digits: fraction.len(),
                max: MAX_FRACTION_DIGITS,
            });
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| AmountError::Overflow)?
        };

        let padded = format!("{fraction:0<width$}", width = MAX_FRACTION_DIGITS);
        let (wei_digits, sub_wei_digits) = padded.split_at(WEI_DECIMALS);
        let fraction_wei: u128 = wei_digits
            .parse()
            .map_err(|_| AmountError::Invalid(trimmed.to_string()))?;
        let sub_wei: u32 = sub_wei_digits
            .parse()
            .map_err(|_| AmountError::Invalid(trimmed.to_string()))?;

        let wei = whole
            .checked_mul(WEI_PER_MKR)
            .and_then(|w| w.checked_add(fraction_wei))
            .ok_or(AmountError::Overflow)?;
        Ok(Self { wei, sub_wei })
    }
}

impl fmt::Display for MkrAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} MKR", self.to_decimal_string())
    }
}

impl From<MkrAmount> for String {
    fn from(amount: MkrAmount) -> Self {
        amount.to_decimal_string()
    }
}

impl TryFrom<String> for MkrAmount {
    type Error = AmountError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mkr(s: &str) -> MkrAmount {
        s.parse().unwrap()
    }

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(mkr("50000"), MkrAmount::from_mkr(50_000).unwrap());
        assert_eq!(mkr("0.5").to_wei_truncated(), WEI_PER_MKR / 2);
        assert_eq!(mkr(".5"), mkr("0.5"));
        assert_eq!(mkr("1."), mkr("1"));
        assert_eq!(mkr("  2.25 MKR "), mkr("2.25"));
    }

    #[test]
    fn smallest_unit_is_one_wei() {
        let one_wei = mkr("0.000000000000000001");
        assert_eq!(one_wei.to_wei_truncated(), 1);
        assert!(one_wei.is_whole_wei());
    }

    #[test]
    fn sub_wei_digits_survive_parsing_and_are_truncated_on_conversion() {
        let amount = mkr("1.0000000000000000019");
        assert_eq!(amount.to_wei_truncated(), WEI_PER_MKR + 1);
        assert_eq!(amount.sub_wei(), 900_000_000);
        assert!(!amount.is_whole_wei());
        assert!(amount > MkrAmount::from_wei(WEI_PER_MKR + 1));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!("".parse::<MkrAmount>(), Err(AmountError::Empty));
        assert_eq!(" MKR".parse::<MkrAmount>(), Err(AmountError::Empty));
        assert!(matches!("-1".parse::<MkrAmount>(), Err(AmountError::Negative(_))));
        assert!(matches!(".".parse::<MkrAmount>(), Err(AmountError::Invalid(_))));
        assert!(matches!("1.2.3".parse::<MkrAmount>(), Err(AmountError::Invalid(_))));
        assert!(matches!("1e18".parse::<MkrAmount>(), Err(AmountError::Invalid(_))));
        assert!(matches!("+1".parse::<MkrAmount>(), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn rejects_more_than_27_fraction_digits() {
        let err = "0.0000000000000000000000000001".parse::<MkrAmount>().unwrap_err();
        assert_eq!(err, AmountError::TooPrecise { digits: 28, max: 27 });
    }

    #[test]
    fn rejects_overflow() {
        let too_big = format!("{}", u128::MAX);
        assert_eq!(too_big.parse::<MkrAmount>(), Err(AmountError::Overflow));
        assert_eq!(MkrAmount::from_mkr(u128::MAX), None);
    }

    #[test]
    fn decimal_string_is_normalized() {
        assert_eq!(MkrAmount::ZERO.to_decimal_string(), "0");
        assert_eq!(mkr("50000.000").to_decimal_string(), "50000");
        assert_eq!(mkr("0.10").to_decimal_string(), "0.1");
        assert_eq!(
            mkr("49999.999999999999999999").to_decimal_string(),
            "49999.999999999999999999"
        );
        assert_eq!(mkr("3.5").to_string(), "3.5 MKR");
    }

    #[test]
    fn add_carries_sub_wei_into_wei() {
        let half = MkrAmount::from_parts(0, 500_000_000).unwrap();
        let sum = half.checked_add(half).unwrap();
        assert_eq!(sum, MkrAmount::from_wei(1));
    }

    #[test]
    fn sub_borrows_from_wei() {
        let one = MkrAmount::from_wei(1);
        let quarter = MkrAmount::from_parts(0, 250_000_000).unwrap();
        let diff = one.checked_sub(quarter).unwrap();
        assert_eq!(diff, MkrAmount::from_parts(0, 750_000_000).unwrap());
        assert_eq!(quarter.checked_sub(one), None);
        assert_eq!(quarter.saturating_sub(one), MkrAmount::ZERO);
    }

    #[test]
    fn from_parts_rejects_full_wei_remainder() {
        assert!(MkrAmount::from_parts(0, 1_000_000_000).is_none());
    }

    #[test]
    fn threshold_boundary_at_18_decimals() {
        let threshold = mkr("50000");
        assert!(mkr("49999.999999999999999999") < threshold);
        assert!(mkr("50000.000000000000000000") >= threshold);
    }

    #[test]
    fn serde_uses_decimal_string() {
        let amount = mkr("1.5");
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1.5\"");
        let back: MkrAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
