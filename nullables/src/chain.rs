//! Nullable chain — an in-memory shutdown contract, liveness contract and token ledger.

use async_trait::async_trait;
use esm_governance::{
    ChainAccessor, ChainError, EsmConfig, IdentityResolver, LivenessContract,
    ShutdownCoordinator, StakingContract, TokenBalanceReader,
};
use esm_types::constants::{GOVERNANCE_TOKEN, LIVENESS_CONTRACT, STAKING_CONTRACT};
use esm_types::{Address, MkrAmount, TxHash};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A state-changing call that reached the chain, accepted or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Stake { from: Address, wei: u128 },
    Fire { from: Address },
}

/// A test chain that keeps ledger state in memory.
///
/// Submissions are checked against the same rules the real contracts enforce
/// (no stake after fire, no fire below the threshold, no second fire), so a
/// call that bypasses local checks is still rejected here. Thread-safe for use
/// with tokio's multi-threaded runtime. Clones share the same ledger.
#[derive(Clone)]
pub struct NullChain {
    ledger: Arc<Ledger>,
}

struct Ledger {
    staking_name: String,
    liveness_name: String,
    token_symbol: String,
    state: Mutex<LedgerState>,
}

struct LedgerState {
    caller: Option<Address>,
    threshold: u128,
    fired: bool,
    live: bool,
    stakes: HashMap<Address, u128>,
    total_staked: u128,
    balances: HashMap<Address, MkrAmount>,
    submissions: Vec<Submission>,
    read_failure: Option<ChainError>,
    submission_failure: Option<ChainError>,
    fire_race_armed: bool,
    reads: usize,
    next_tx: u64,
}

impl NullChain {
    /// A live, unfired chain with zero threshold, acting as `caller`.
    pub fn new(caller: Address) -> Self {
        Self {
            ledger: Arc::new(Ledger {
                staking_name: STAKING_CONTRACT.to_string(),
                liveness_name: LIVENESS_CONTRACT.to_string(),
                token_symbol: GOVERNANCE_TOKEN.to_string(),
                state: Mutex::new(LedgerState {
                    caller: Some(caller),
                    threshold: 0,
                    fired: false,
                    live: true,
                    stakes: HashMap::new(),
                    total_staked: 0,
                    balances: HashMap::new(),
                    submissions: Vec::new(),
                    read_failure: None,
                    submission_failure: None,
                    fire_race_armed: false,
                    reads: 0,
                    next_tx: 0,
                }),
            }),
        }
    }

    /// Build a coordinator wired to this chain for every collaborator.
    pub fn coordinator(&self, config: EsmConfig) -> ShutdownCoordinator {
        let chain = Arc::new(self.clone());
        ShutdownCoordinator::new(config, chain.clone(), chain.clone(), chain)
    }

    // ── Seeding ────────────────────────────────────────────────────────

    /// Change the account submissions come from; `None` means no account.
    pub fn set_caller(&self, caller: Option<Address>) {
        self.ledger.state().caller = caller;
    }

    pub fn set_threshold(&self, threshold: MkrAmount) {
        self.ledger.state().threshold = threshold.to_wei_truncated();
    }

    pub fn set_fired(&self, fired: bool) {
        self.ledger.state().fired = fired;
    }

    pub fn set_live(&self, live: bool) {
        self.ledger.state().live = live;
    }

    pub fn set_balance(&self, address: &Address, balance: MkrAmount) {
        self.ledger.state().balances.insert(*address, balance);
    }

    /// Set the stake held by `address`, adjusting the total by the difference.
    pub fn set_stake(&self, address: &Address, stake: MkrAmount) {
        let mut state = self.ledger.state();
        let wei = stake.to_wei_truncated();
        let previous = state.stakes.insert(*address, wei).unwrap_or(0);
        state.total_staked = state.total_staked.saturating_sub(previous) + wei;
    }

    /// Override the total, as if unknown accounts had staked.
    pub fn set_total_staked(&self, total: MkrAmount) {
        self.ledger.state().total_staked = total.to_wei_truncated();
    }

    // ── Failure injection ──────────────────────────────────────────────

    /// Every read fails with `error` until [`clear_read_failure`](Self::clear_read_failure).
    pub fn fail_reads(&self, error: ChainError) {
        self.ledger.state().read_failure = Some(error);
    }

    pub fn clear_read_failure(&self) {
        self.ledger.state().read_failure = None;
    }

    /// The next submission is recorded, then fails with `error`.
    pub fn fail_next_submission(&self, error: ChainError) {
        self.ledger.state().submission_failure = Some(error);
    }

    /// Another actor fires just before the next fire submission lands.
    pub fn race_next_fire(&self) {
        self.ledger.state().fire_race_armed = true;
    }

    // ── Inspection ─────────────────────────────────────────────────────

    /// All submissions attempted so far, in order.
    pub fn submissions(&self) -> Vec<Submission> {
        self.ledger.state().submissions.clone()
    }

    pub fn submission_count(&self) -> usize {
        self.ledger.state().submissions.len()
    }

    /// Number of contract and balance reads served (failed ones included).
    pub fn read_count(&self) -> usize {
        self.ledger.state().reads
    }

    pub fn is_fired(&self) -> bool {
        self.ledger.state().fired
    }

    pub fn is_live(&self) -> bool {
        self.ledger.state().live
    }

    pub fn balance(&self, address: &Address) -> MkrAmount {
        self.ledger
            .state()
            .balances
            .get(address)
            .copied()
            .unwrap_or(MkrAmount::ZERO)
    }

    pub fn stake_of(&self, address: &Address) -> MkrAmount {
        let wei = self.ledger.state().stakes.get(address).copied().unwrap_or(0);
        MkrAmount::from_wei(wei)
    }

    pub fn total_staked(&self) -> MkrAmount {
        MkrAmount::from_wei(self.ledger.state().total_staked)
    }
}

impl Ledger {
    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> Result<T, ChainError> {
        let mut state = self.state();
        state.reads += 1;
        match &state.read_failure {
            Some(error) => Err(error.clone()),
            None => Ok(f(&state)),
        }
    }

    /// Record the attempt and hand back the sender, or the injected failure.
    fn begin_submission(
        state: &mut LedgerState,
        submission: impl FnOnce(Address) -> Submission,
    ) -> Result<Address, ChainError> {
        let from = state.caller.ok_or(ChainError::NoAccount)?;
        state.submissions.push(submission(from));
        match state.submission_failure.take() {
            Some(error) => Err(error),
            None => Ok(from),
        }
    }

    fn next_tx_hash(state: &mut LedgerState) -> TxHash {
        state.next_tx += 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&state.next_tx.to_be_bytes());
        TxHash::new(bytes)
    }
}

#[async_trait]
impl StakingContract for Ledger {
    async fn read_minimum_threshold(&self) -> Result<u128, ChainError> {
        self.read(|s| s.threshold)
    }

    async fn read_fired_flag(&self) -> Result<u128, ChainError> {
        self.read(|s| u128::from(s.fired))
    }

    async fn read_total_staked(&self) -> Result<u128, ChainError> {
        self.read(|s| s.total_staked)
    }

    async fn read_staked_by(&self, address: &Address) -> Result<u128, ChainError> {
        self.read(|s| s.stakes.get(address).copied().unwrap_or(0))
    }

    async fn submit_stake(&self, wei: u128) -> Result<TxHash, ChainError> {
        let mut state = self.state();
        let from = Self::begin_submission(&mut state, |from| Submission::Stake { from, wei })?;
        if state.fired {
            return Err(ChainError::Rejected("esm/fired".into()));
        }

        let amount = MkrAmount::from_wei(wei);
        let balance = state.balances.get(&from).copied().unwrap_or(MkrAmount::ZERO);
        let remaining = balance
            .checked_sub(amount)
            .ok_or_else(|| ChainError::Rejected("token/insufficient-balance".into()))?;
        let total = state
            .total_staked
            .checked_add(wei)
            .ok_or_else(|| ChainError::Rejected("esm/overflow".into()))?;

        state.balances.insert(from, remaining);
        *state.stakes.entry(from).or_insert(0) += wei;
        state.total_staked = total;
        Ok(Self::next_tx_hash(&mut state))
    }

    async fn submit_fire(&self) -> Result<TxHash, ChainError> {
        let mut state = self.state();
        Self::begin_submission(&mut state, |from| Submission::Fire { from })?;
        if state.fire_race_armed {
            state.fire_race_armed = false;
            state.fired = true;
            state.live = false;
        }
        if state.fired {
            return Err(ChainError::Rejected("esm/already-fired".into()));
        }
        if state.total_staked < state.threshold {
            return Err(ChainError::Rejected("esm/min-not-reached".into()));
        }
        if !state.live {
            return Err(ChainError::Rejected("end/not-live".into()));
        }

        state.fired = true;
        state.live = false;
        Ok(Self::next_tx_hash(&mut state))
    }
}

#[async_trait]
impl LivenessContract for Ledger {
    async fn read_live_flag(&self) -> Result<u128, ChainError> {
        self.read(|s| u128::from(s.live))
    }
}

impl ChainAccessor for NullChain {
    fn staking_contract(&self, name: &str) -> Result<Arc<dyn StakingContract>, ChainError> {
        if name != self.ledger.staking_name {
            return Err(ChainError::ContractNotFound(name.to_string()));
        }
        Ok(self.ledger.clone())
    }

    fn liveness_contract(&self, name: &str) -> Result<Arc<dyn LivenessContract>, ChainError> {
        if name != self.ledger.liveness_name {
            return Err(ChainError::ContractNotFound(name.to_string()));
        }
        Ok(self.ledger.clone())
    }
}

#[async_trait]
impl TokenBalanceReader for NullChain {
    async fn read_balance(
        &self,
        address: &Address,
        symbol: &str,
    ) -> Result<MkrAmount, ChainError> {
        if symbol != self.ledger.token_symbol {
            return Err(ChainError::Read(format!("unknown token {symbol}")));
        }
        self.ledger
            .read(|s| s.balances.get(address).copied().unwrap_or(MkrAmount::ZERO))
    }
}

impl IdentityResolver for NullChain {
    fn current_caller_address(&self) -> Result<Address, ChainError> {
        self.ledger.state().caller.ok_or(ChainError::NoAccount)
    }
}
