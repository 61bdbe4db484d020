//! Emergency shutdown staking coordination.
//!
//! Holders stake the governance token against the shutdown contract. Once the
//! total staked reaches the configured threshold, anyone may fire the shutdown,
//! an irreversible action. [`ShutdownCoordinator`] evaluates the on-chain guards
//! before each state-changing submission so that doomed calls are not sent.
//!
//! The guards are a client-side check, not a lock: state can change between the
//! reads and the submission, and the chain remains the final arbiter.
//!
//! Collaborators (contract resolution, token balances, caller identity) are
//! injected as trait objects, see [`chain`].

pub mod chain;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod status;

pub use chain::{
    ChainAccessor, ChainError, IdentityResolver, LivenessContract, StakingContract,
    TokenBalanceReader,
};
pub use config::{ConfigError, EsmConfig};
pub use coordinator::ShutdownCoordinator;
pub use error::EsmError;
pub use status::ShutdownStatus;
