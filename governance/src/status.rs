//! Point-in-time view of the shutdown mechanism.

use esm_types::MkrAmount;
use serde::{Deserialize, Serialize};

/// Snapshot of the shutdown state, read in one concurrent batch.
///
/// Stale as soon as it is returned; use it for display, not as a guard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownStatus {
    pub threshold: MkrAmount,
    pub total_staked: MkrAmount,
    pub fired: bool,
    pub emergency_active: bool,
}

impl ShutdownStatus {
    /// Neither fired nor already in emergency shutdown.
    pub fn can_fire(&self) -> bool {
        !self.fired && !self.emergency_active
    }

    pub fn threshold_reached(&self) -> bool {
        self.total_staked >= self.threshold
    }

    /// Additional stake needed before the threshold is met.
    pub fn remaining_to_threshold(&self) -> MkrAmount {
        self.threshold.saturating_sub(self.total_staked)
    }

    /// Whether a guarded trigger would pass its local checks right now.
    pub fn ready_to_fire(&self) -> bool {
        self.threshold_reached() && self.can_fire()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(threshold: u128, total: u128, fired: bool, emergency_active: bool) -> ShutdownStatus {
        ShutdownStatus {
            threshold: MkrAmount::from_mkr(threshold).unwrap(),
            total_staked: MkrAmount::from_mkr(total).unwrap(),
            fired,
            emergency_active,
        }
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        assert_eq!(
            status(50_000, 20_000, false, false).remaining_to_threshold(),
            MkrAmount::from_mkr(30_000).unwrap()
        );
        assert!(status(50_000, 60_000, false, false)
            .remaining_to_threshold()
            .is_zero());
    }

    #[test]
    fn ready_requires_threshold_and_eligibility() {
        assert!(status(10, 10, false, false).ready_to_fire());
        assert!(!status(10, 9, false, false).ready_to_fire());
        assert!(!status(10, 10, true, false).ready_to_fire());
        assert!(!status(10, 10, false, true).ready_to_fire());
    }

    #[test]
    fn serializes_amounts_as_decimal_strings() {
        let json = serde_json::to_value(status(50_000, 1, false, false)).unwrap();
        assert_eq!(json["threshold"], "50000");
        assert_eq!(json["total_staked"], "1");
        assert_eq!(json["fired"], false);
    }
}
