use crate::chain::ChainError;
use esm_types::MkrAmount;
use thiserror::Error;

/// Failures of coordinator operations.
///
/// The first four variants are local guard rejections, raised before anything is
/// submitted. Collaborator failures pass through unchanged as [`EsmError::Chain`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EsmError {
    #[error("cannot join when emergency shutdown has been fired")]
    ShutdownAlreadyFired,

    #[error("amount to join is greater than the user balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: MkrAmount,
        available: MkrAmount,
    },

    #[error("total staked has not reached the required threshold: {total_staked} < {threshold}")]
    ThresholdNotReached {
        total_staked: MkrAmount,
        threshold: MkrAmount,
    },

    #[error("emergency shutdown has already been initiated")]
    AlreadyTriggered,

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl EsmError {
    /// Whether this is a local guard rejection (nothing was submitted).
    pub fn is_guard_violation(&self) -> bool {
        !matches!(self, Self::Chain(_))
    }
}
