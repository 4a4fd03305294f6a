use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delays used to pace automatic transitions for a human observer.
///
/// Only the rhythm of play depends on these; any values, including zero,
/// produce the same sequence of states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// Wait before a scripted seat acts.
    pub opponent_delay: Duration,
    /// Wait between a resolved hand and the next deal.
    pub next_hand_delay: Duration,
    /// Deal the next hand automatically once one is resolved.
    pub auto_deal: bool,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            opponent_delay: Duration::from_millis(1_000),
            next_hand_delay: Duration::from_millis(2_000),
            auto_deal: true,
        }
    }
}

impl Pacing {
    pub fn instant() -> Self {
        Self {
            opponent_delay: Duration::ZERO,
            next_hand_delay: Duration::ZERO,
            auto_deal: true,
        }
    }

    /// Same opponent delay for every seat, next hand after twice that.
    pub fn from_millis(opponent_ms: u64) -> Self {
        Self {
            opponent_delay: Duration::from_millis(opponent_ms),
            next_hand_delay: Duration::from_millis(opponent_ms.saturating_mul(2)),
            auto_deal: true,
        }
    }

    pub fn without_auto_deal(mut self) -> Self {
        self.auto_deal = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pacing_matches_human_rhythm() {
        let pacing = Pacing::default();
        assert_eq!(pacing.opponent_delay, Duration::from_secs(1));
        assert_eq!(pacing.next_hand_delay, Duration::from_secs(2));
        assert!(pacing.auto_deal);
    }

    #[test]
    fn from_millis_doubles_hand_break() {
        let pacing = Pacing::from_millis(250).without_auto_deal();
        assert_eq!(pacing.next_hand_delay, Duration::from_millis(500));
        assert!(!pacing.auto_deal);
    }

    #[test]
    fn huge_delay_saturates() {
        let pacing = Pacing::from_millis(u64::MAX);
        assert_eq!(pacing.next_hand_delay, Duration::from_millis(u64::MAX));
    }
}
