//! # Sim Command
//!
//! Headless session: every seat, seat 0 included, is driven by the
//! configured policy through the synchronous engine, with chip
//! conservation checked after every hand.

use crate::error::CliError;
use crate::ui;
use dojo_ai::{OpponentPolicy, create_policy};
use dojo_engine::engine::{Engine, Step};
use dojo_engine::errors::GameError;
use dojo_engine::rules::Action;
use dojo_engine::table::{HUMAN_SEAT, TableSnapshot};
use std::io::Write;

use super::resolve_config;

pub fn handle_sim_command(
    hands: u32,
    seed: Option<u64>,
    seats: Option<usize>,
    policy: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }
    let cfg = resolve_config(seed, seats, policy)?;
    let mut engine = Engine::new(cfg.table_config())?;
    let base_seed = engine.seed();
    let mut policies = (0..cfg.seats)
        .map(|seat| create_policy(&cfg.policy, Some(base_seed.wrapping_add(seat as u64))))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| CliError::InvalidInput(format!("unknown policy '{}'", cfg.policy)))?;
    let total = cfg.starting_stack * cfg.seats as u32;

    writeln!(
        out,
        "Simulating {} hands: {} seats, policy {}, seed {}",
        hands, cfg.seats, cfg.policy, base_seed
    )?;

    let mut played = 0;
    for _ in 0..hands {
        match engine.try_start_new_hand() {
            Ok(_) => {}
            Err(GameError::NotEnoughPlayers { funded }) => {
                ui::display_warning(
                    err,
                    &format!("stopping early, only {} seat(s) have chips", funded),
                )?;
                break;
            }
            Err(e) => return Err(e.into()),
        }
        let resolved = play_out(&mut engine, &mut policies)?;
        played += 1;

        let stacks: u32 = resolved.seats.iter().map(|s| s.stack).sum();
        if stacks != total {
            return Err(CliError::Engine(format!(
                "chip conservation violated after hand {}: {} != {}",
                resolved.hand_id, stacks, total
            )));
        }
        if let Some(outcome) = &resolved.outcome {
            tracing::debug!(hand_id = resolved.hand_id, result = %outcome.message, "hand simulated");
        }
    }

    writeln!(out, "Simulated: {} hands", played)?;
    for seat in &engine.snapshot().seats {
        let net = i64::from(seat.stack) - i64::from(cfg.starting_stack);
        writeln!(out, "  {:<8} {:>6} ({:+})", seat.name, seat.stack, net)?;
    }
    Ok(())
}

/// Drives the current hand to its resolution and returns the final snapshot.
fn play_out(
    engine: &mut Engine,
    policies: &mut [Box<dyn OpponentPolicy>],
) -> Result<TableSnapshot, CliError> {
    loop {
        let snapshot = engine.snapshot();
        engine
            .table()
            .check_invariants()
            .map_err(|e| CliError::Engine(format!("hand {}: {}", snapshot.hand_id, e)))?;

        if snapshot.is_human_turn() {
            let action = policies[HUMAN_SEAT].decide(&snapshot, HUMAN_SEAT);
            let after = engine.submit_action(action);
            if after.seq == snapshot.seq
                && engine.submit_action(Action::Call).seq == snapshot.seq
            {
                return Err(CliError::Engine(format!(
                    "seat {} could not act in hand {}",
                    HUMAN_SEAT, snapshot.hand_id
                )));
            }
            continue;
        }
        match engine.pending() {
            Some(cont) if matches!(cont.step, Step::OpponentTurn { .. }) => {
                engine.resume(&cont, |snap, seat| policies[seat].decide(snap, seat))?;
            }
            _ => return Ok(snapshot),
        }
    }
}
