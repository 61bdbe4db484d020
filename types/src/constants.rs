//! Well-known names resolved through the chain collaborator.

/// Contract that tracks stakes and the fired flag.
pub const STAKING_CONTRACT: &str = "ESM";

/// Contract that tracks whether the broader system is still live.
pub const LIVENESS_CONTRACT: &str = "END";

/// Symbol of the governance token staked against the shutdown contract.
pub const GOVERNANCE_TOKEN: &str = "MKR";

/// Value of the fired flag once the shutdown has been executed.
pub const FIRED: u128 = 1;

/// Value of the liveness flag once the system has been shut down.
pub const NOT_LIVE: u128 = 0;
