//! Parse and arithmetic errors for the value types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount string is empty")]
    Empty,

    #[error("amount cannot be negative: {0}")]
    Negative(String),

    #[error("invalid amount: {0}")]
    Invalid(String),

    #[error("amount has {digits} fractional digits, at most {max} are supported")]
    TooPrecise { digits: usize, max: usize },

    #[error("amount overflows the supported range")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must be {expected} hex characters, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex in address: {0}")]
    InvalidHex(String),
}
