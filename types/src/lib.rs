//! Fundamental types for the emergency shutdown module (ESM).
//!
//! This crate defines the value types shared by every other crate in the workspace:
//! governance token amounts, account addresses, transaction hashes and the
//! well-known contract and token names.

pub mod address;
pub mod amount;
pub mod constants;
pub mod error;
pub mod hash;

pub use address::Address;
pub use amount::MkrAmount;
pub use error::{AddressError, AmountError};
pub use hash::TxHash;
