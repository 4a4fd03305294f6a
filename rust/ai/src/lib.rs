//! # dojo-ai: scripted opponents
//!
//! Decision functions for the non-human seats. A policy only ever sees a
//! [`TableSnapshot`]; it never touches engine state.
//!
//! ## Quick Start
//!
//! ```rust
//! use dojo_ai::create_policy;
//! use dojo_engine::engine::Engine;
//! use dojo_engine::table::TableConfig;
//!
//! let mut policy = create_policy("scripted", Some(42)).expect("known policy");
//!
//! let mut engine = Engine::new(TableConfig { seed: Some(42), ..TableConfig::default() }).unwrap();
//! let snap = engine.start_new_hand();
//! let seat = snap.active_player.expect("someone to act");
//! let action = policy.decide(&snap, seat);
//! println!("{} chose {action}", policy.name());
//! ```
//!
//! ## Policies
//!
//! - `"scripted"` - the stochastic call/fold/raise mix ([`scripted::ScriptedPolicy`])
//! - `"passive"` - always checks or calls ([`passive::PassivePolicy`])

use dojo_engine::rules::Action;
use dojo_engine::table::TableSnapshot;

pub mod passive;
pub mod scripted;

/// Chooses an action for a seat from a read-only snapshot.
///
/// # Example Implementation
///
/// ```rust
/// use dojo_ai::OpponentPolicy;
/// use dojo_engine::rules::Action;
/// use dojo_engine::table::TableSnapshot;
///
/// struct Folder;
///
/// impl OpponentPolicy for Folder {
///     fn decide(&mut self, _snapshot: &TableSnapshot, _seat: usize) -> Action {
///         Action::Fold
///     }
///
///     fn name(&self) -> &str {
///         "Folder"
///     }
/// }
/// ```
pub trait OpponentPolicy: Send {
    /// `seat` is the seat due to act in `snapshot`.
    fn decide(&mut self, snapshot: &TableSnapshot, seat: usize) -> Action;

    fn name(&self) -> &str;
}

/// Names accepted by [`create_policy`].
pub const POLICY_NAMES: [&str; 2] = ["scripted", "passive"];

/// Builds a policy by name. `seed` fixes the random source for policies
/// that use one. Returns `None` for an unknown name.
///
/// ```rust
/// use dojo_ai::create_policy;
///
/// assert_eq!(create_policy("passive", None).unwrap().name(), "PassivePolicy");
/// assert!(create_policy("gto", None).is_none());
/// ```
pub fn create_policy(name: &str, seed: Option<u64>) -> Option<Box<dyn OpponentPolicy>> {
    match name {
        "scripted" => Some(Box::new(match seed {
            Some(seed) => scripted::ScriptedPolicy::with_seed(seed),
            None => scripted::ScriptedPolicy::new(),
        })),
        "passive" => Some(Box::new(passive::PassivePolicy)),
        _ => None,
    }
}
