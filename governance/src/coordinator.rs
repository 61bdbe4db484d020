//! Guarded staking and shutdown triggering.
//!
//! Every operation re-reads chain state; nothing is cached between calls.
//! Independent reads are issued concurrently and joined before a guard
//! decision.
//!
//! ## Check-then-act is not atomic
//!
//! A guarded [`ShutdownCoordinator::stake`] or
//! [`ShutdownCoordinator::trigger_emergency_shutdown`] reads state, decides,
//! then submits. Another actor's stake or fire can land in between, so a call
//! whose local guards passed may still be rejected by the chain. That rejection
//! is returned as [`EsmError::Chain`]; this layer never retries.

use crate::chain::{
    ChainAccessor, ChainError, IdentityResolver, LivenessContract, StakingContract,
    TokenBalanceReader,
};
use crate::config::EsmConfig;
use crate::error::EsmError;
use crate::status::ShutdownStatus;
use esm_types::constants::{FIRED, NOT_LIVE};
use esm_types::{Address, MkrAmount, TxHash};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Coordinates staking against the shutdown contract and firing the shutdown.
///
/// Holds no mutable state; share it behind an `Arc` if needed.
pub struct ShutdownCoordinator {
    config: EsmConfig,
    chain: Arc<dyn ChainAccessor>,
    balances: Arc<dyn TokenBalanceReader>,
    identity: Arc<dyn IdentityResolver>,
}

impl ShutdownCoordinator {
    pub fn new(
        config: EsmConfig,
        chain: Arc<dyn ChainAccessor>,
        balances: Arc<dyn TokenBalanceReader>,
        identity: Arc<dyn IdentityResolver>,
    ) -> Self {
        Self {
            config,
            chain,
            balances,
            identity,
        }
    }

    pub fn config(&self) -> &EsmConfig {
        &self.config
    }

    /// Minimum total stake required before the shutdown can fire.
    pub async fn threshold_amount(&self) -> Result<MkrAmount, EsmError> {
        let raw = self.staking()?.read_minimum_threshold().await?;
        Ok(MkrAmount::from_wei(raw))
    }

    /// Whether the shutdown has already been fired. Once true, stays true.
    pub async fn fired(&self) -> Result<bool, EsmError> {
        let flag = self.staking()?.read_fired_flag().await?;
        Ok(flag == FIRED)
    }

    /// Whether the system has left normal operation, by this module or another path.
    pub async fn emergency_shutdown_active(&self) -> Result<bool, EsmError> {
        let live = self.liveness()?.read_live_flag().await?;
        Ok(live == NOT_LIVE)
    }

    /// True only if the shutdown has not fired and the system is still live.
    pub async fn can_fire(&self) -> Result<bool, EsmError> {
        let (fired, emergency_active) =
            tokio::try_join!(self.fired(), self.emergency_shutdown_active())?;
        debug!(fired, emergency_active, "evaluated fire eligibility");
        Ok(!fired && !emergency_active)
    }

    /// Sum of all stakes.
    pub async fn total_staked(&self) -> Result<MkrAmount, EsmError> {
        let raw = self.staking()?.read_total_staked().await?;
        Ok(MkrAmount::from_wei(raw))
    }

    /// Stake held by `address`, or by the current caller when `None`.
    pub async fn total_staked_by(&self, address: Option<&Address>) -> Result<MkrAmount, EsmError> {
        let address = match address {
            Some(address) => *address,
            None => self.identity.current_caller_address()?,
        };
        let raw = self.staking()?.read_staked_by(&address).await?;
        Ok(MkrAmount::from_wei(raw))
    }

    /// Stake `amount` of the governance token from the caller's account.
    ///
    /// With `skip_checks = false` the fired flag and the caller's balance are read
    /// concurrently first; the call fails with [`EsmError::ShutdownAlreadyFired`] or
    /// [`EsmError::InsufficientBalance`] without submitting anything. The balance
    /// comparison uses the full precision of `amount`; sub-wei digits are dropped
    /// only in the submitted value.
    ///
    /// With `skip_checks = true` the stake is submitted as is and any rejection
    /// comes from the chain.
    #[instrument(skip(self, amount), fields(amount = %amount))]
    pub async fn stake(&self, amount: MkrAmount, skip_checks: bool) -> Result<TxHash, EsmError> {
        if skip_checks {
            warn!("submitting stake without local checks");
        } else {
            let caller = self.identity.current_caller_address()?;
            let (fired, balance) = tokio::try_join!(self.fired(), self.balance_of(&caller))?;
            debug!(fired, %balance, %caller, "stake guard inputs");
            if fired {
                warn!("stake refused: shutdown already fired");
                return Err(EsmError::ShutdownAlreadyFired);
            }
            if balance < amount {
                warn!(%balance, "stake refused: insufficient balance");
                return Err(EsmError::InsufficientBalance {
                    requested: amount,
                    available: balance,
                });
            }
        }

        let wei = amount.to_wei_truncated();
        let tx = self.staking()?.submit_stake(wei).await?;
        info!(%tx, wei, "stake submitted");
        Ok(tx)
    }

    /// Fire the emergency shutdown. Irreversible.
    ///
    /// With `skip_checks = false` the threshold, the total stake and
    /// [`can_fire`](Self::can_fire) are read concurrently first. The threshold is
    /// checked before eligibility, so an under-staked trigger reports
    /// [`EsmError::ThresholdNotReached`] even when the shutdown already fired.
    #[instrument(skip(self))]
    pub async fn trigger_emergency_shutdown(&self, skip_checks: bool) -> Result<TxHash, EsmError> {
        if skip_checks {
            warn!("submitting fire without local checks");
        } else {
            let (threshold, total_staked, can_fire) =
                tokio::try_join!(self.threshold_amount(), self.total_staked(), self.can_fire())?;
            debug!(%threshold, %total_staked, can_fire, "fire guard inputs");
            if total_staked < threshold {
                warn!(%threshold, %total_staked, "fire refused: threshold not reached");
                return Err(EsmError::ThresholdNotReached {
                    total_staked,
                    threshold,
                });
            }
            if !can_fire {
                warn!("fire refused: shutdown already initiated");
                return Err(EsmError::AlreadyTriggered);
            }
        }

        let tx = self.staking()?.submit_fire().await?;
        info!(%tx, "emergency shutdown fired");
        Ok(tx)
    }

    /// Threshold, total stake and both flags, read concurrently.
    pub async fn status(&self) -> Result<ShutdownStatus, EsmError> {
        let (threshold, total_staked, fired, emergency_active) = tokio::try_join!(
            self.threshold_amount(),
            self.total_staked(),
            self.fired(),
            self.emergency_shutdown_active()
        )?;
        Ok(ShutdownStatus {
            threshold,
            total_staked,
            fired,
            emergency_active,
        })
    }

    async fn balance_of(&self, address: &Address) -> Result<MkrAmount, EsmError> {
        let balance = self
            .balances
            .read_balance(address, &self.config.token_symbol)
            .await?;
        Ok(balance)
    }

    fn staking(&self) -> Result<Arc<dyn StakingContract>, ChainError> {
        self.chain.staking_contract(&self.config.staking_contract)
    }

    fn liveness(&self) -> Result<Arc<dyn LivenessContract>, ChainError> {
        self.chain.liveness_contract(&self.config.liveness_contract)
    }
}
