use crate::OpponentPolicy;
use dojo_engine::rules::Action;
use dojo_engine::table::TableSnapshot;

/// Checks or calls every time. Useful for deterministic table walks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassivePolicy;

impl OpponentPolicy for PassivePolicy {
    fn decide(&mut self, _snapshot: &TableSnapshot, _seat: usize) -> Action {
        Action::Call
    }

    fn name(&self) -> &str {
        "PassivePolicy"
    }
}
