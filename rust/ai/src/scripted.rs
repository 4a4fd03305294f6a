//! The stochastic opponent used for every bot seat by default.
//!
//! One uniform roll per decision picks between check/call, fold and a
//! minimum raise. Hand strength is ignored on purpose.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::OpponentPolicy;
use dojo_engine::rules::Action;
use dojo_engine::table::TableSnapshot;

const CHECK_WHEN_FREE: f64 = 0.8;
const CALL_WHEN_FACING: f64 = 0.7;
const FOLD_WHEN_FACING: f64 = 0.95;

#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    rng: ChaCha20Rng,
}

impl ScriptedPolicy {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// The decision for a given roll `r` in `[0, 1)`.
    ///
    /// ```rust
    /// use dojo_ai::scripted::ScriptedPolicy;
    /// use dojo_engine::engine::Engine;
    /// use dojo_engine::rules::Action;
    /// use dojo_engine::table::TableConfig;
    ///
    /// let mut engine = Engine::new(TableConfig { seed: Some(1), ..TableConfig::default() }).unwrap();
    /// let snap = engine.start_new_hand();
    /// // UTG faces the big blind
    /// assert_eq!(ScriptedPolicy::decide_with_roll(&snap, 3, 0.5), Action::Call);
    /// assert_eq!(ScriptedPolicy::decide_with_roll(&snap, 3, 0.9), Action::Fold);
    /// assert_eq!(ScriptedPolicy::decide_with_roll(&snap, 3, 0.99), Action::Raise(40));
    /// ```
    pub fn decide_with_roll(snapshot: &TableSnapshot, seat: usize, r: f64) -> Action {
        let to_call = snapshot.to_call(seat);
        if to_call == 0 && snapshot.acted.contains(&seat) {
            return Action::Call;
        }
        if to_call == 0 {
            if r < CHECK_WHEN_FREE {
                Action::Call
            } else {
                raise_or_call(snapshot, seat)
            }
        } else if r < CALL_WHEN_FACING {
            Action::Call
        } else if r < FOLD_WHEN_FACING {
            Action::Fold
        } else {
            raise_or_call(snapshot, seat)
        }
    }
}

impl Default for ScriptedPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimum raise, shrunk to an all-in when the stack is short.
fn raise_or_call(snapshot: &TableSnapshot, seat: usize) -> Action {
    let Some(view) = snapshot.seat(seat) else {
        return Action::Call;
    };
    let target = (snapshot.current_bet + snapshot.min_raise_increment()).min(view.stack + view.bet);
    if target <= snapshot.current_bet {
        Action::Call
    } else {
        Action::Raise(target)
    }
}

impl OpponentPolicy for ScriptedPolicy {
    fn decide(&mut self, snapshot: &TableSnapshot, seat: usize) -> Action {
        let r: f64 = self.rng.random();
        Self::decide_with_roll(snapshot, seat, r)
    }

    fn name(&self) -> &str {
        "ScriptedPolicy"
    }
}
