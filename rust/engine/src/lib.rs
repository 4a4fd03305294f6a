//! # dojo-engine: single-table Hold'em practice engine
//!
//! Runs No-Limit Texas Hold'em hands for one human seat against scripted
//! opponents. The engine is a plain owned state machine: callers deal a hand,
//! submit actions and read back immutable [`table::TableSnapshot`]s. Anything
//! that should happen without human input is exposed as a stamped
//! [`engine::Continuation`] for the caller to schedule.
//!
//! ## Modules
//!
//! - [`cards`] - Card, rank and suit values
//! - [`deck`] - Seeded 52-card deck
//! - [`hand`] - Coarse hand ranking by rank multiplicity
//! - [`seat`] - Per-seat chips, cards and position
//! - [`table`] - Table configuration, state and snapshots
//! - [`rules`] - Action validation, blinds and round completion
//! - [`showdown`] - Winner selection and pot split
//! - [`engine`] - Street sequencing and continuations
//! - [`errors`] - Error type for refused operations
//!
//! ## Quick Start
//!
//! ```rust
//! use dojo_engine::engine::Engine;
//! use dojo_engine::rules::Action;
//! use dojo_engine::table::TableConfig;
//!
//! let mut engine = Engine::new(TableConfig { seed: Some(42), ..TableConfig::default() }).unwrap();
//! engine.start_new_hand();
//!
//! // let the scripted seats call around until the human is due
//! while let Some(cont) = engine.pending() {
//!     if engine.snapshot().is_human_turn() {
//!         break;
//!     }
//!     engine.resume(&cont, |_, _| Action::Call).unwrap();
//!     if !engine.snapshot().is_live() {
//!         break;
//!     }
//! }
//! let snap = engine.submit_action(Action::Fold);
//! assert!(!snap.seats[0].active);
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod hand;
pub mod rules;
pub mod seat;
pub mod showdown;
pub mod table;

pub use hand::evaluate;
