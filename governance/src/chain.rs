//! Collaborator interfaces consumed by the coordinator.
//!
//! Everything that touches the chain sits behind these traits: contract
//! resolution, contract reads and submissions, token balances and the caller's
//! identity. They are object-safe and `Send + Sync` so the coordinator can hold
//! them as `Arc<dyn _>`.
//!
//! Amounts cross this boundary as raw integers scaled by 10^18 (wei), except
//! [`TokenBalanceReader`], which already returns a decimal [`MkrAmount`].
//!
//! Implementations must not retry internally; retry policy, timeouts and
//! cancellation belong to whoever drives the transport.

use async_trait::async_trait;
use esm_types::{Address, MkrAmount, TxHash};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by chain collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("contract {0} not found")]
    ContractNotFound(String),

    #[error("no account available for the current caller")]
    NoAccount,

    #[error("chain read failed: {0}")]
    Read(String),

    #[error("submission rejected by chain: {0}")]
    Rejected(String),

    #[error("chain network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

/// The shutdown contract: tracks stakes and the fired flag.
#[async_trait]
pub trait StakingContract: Send + Sync {
    /// Minimum total stake required to fire, in wei.
    async fn read_minimum_threshold(&self) -> Result<u128, ChainError>;

    /// Raw fired flag: `1` once the shutdown has been executed, `0` before.
    async fn read_fired_flag(&self) -> Result<u128, ChainError>;

    /// Sum of all stakes, in wei.
    async fn read_total_staked(&self) -> Result<u128, ChainError>;

    /// Stake held by `address`, in wei.
    async fn read_staked_by(&self, address: &Address) -> Result<u128, ChainError>;

    /// Stake `wei` from the caller's account.
    async fn submit_stake(&self, wei: u128) -> Result<TxHash, ChainError>;

    /// Fire the emergency shutdown.
    async fn submit_fire(&self) -> Result<TxHash, ChainError>;
}

/// The liveness contract: tracks whether the system still operates normally.
#[async_trait]
pub trait LivenessContract: Send + Sync {
    /// Raw liveness flag: `1` while live, `0` once shut down.
    async fn read_live_flag(&self) -> Result<u128, ChainError>;
}

/// Resolves named contract instances.
pub trait ChainAccessor: Send + Sync {
    fn staking_contract(&self, name: &str) -> Result<Arc<dyn StakingContract>, ChainError>;

    fn liveness_contract(&self, name: &str) -> Result<Arc<dyn LivenessContract>, ChainError>;
}

/// Reads token balances.
#[async_trait]
pub trait TokenBalanceReader: Send + Sync {
    async fn read_balance(&self, address: &Address, symbol: &str)
        -> Result<MkrAmount, ChainError>;
}

/// Knows which account the current caller acts as.
pub trait IdentityResolver: Send + Sync {
    fn current_caller_address(&self) -> Result<Address, ChainError>;
}
