//! # Play Command
//!
//! Interactive session at seat 0 against scripted opponents.
//!
//! The table runs as an actor on a single-threaded tokio runtime. This
//! module only renders the snapshots it publishes and forwards typed
//! actions; opponent turns are paced by the actor's own timers.

use crate::error::CliError;
use crate::formatters::{format_action, format_board, format_choices, format_outcome, format_table};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{ParseResult, explain_rejection, parse_player_action, resolve_all_in};
use dojo_engine::table::{HUMAN_SEAT, Phase, TableSnapshot};
use dojo_runtime::{EventReceiver, Pacing, TableEvent, TableHandle, Transition, spawn_table};
use std::io::{BufRead, Write};

use super::resolve_config;

/// Handle the play command.
///
/// # Arguments
///
/// * `hands` - Stop after this many completed hands (must be >= 1)
/// * `seed`, `seats`, `policy` - Override the resolved configuration
/// * `delay_ms` - Opponent pacing; the configured delay when `None`
/// * `out` - Table rendering and prompts
/// * `err` - Warnings for unusable input
/// * `stdin` - Typed actions
///
/// # Errors
///
/// `CliError::InvalidInput` for `hands == 0` or bad overrides. Typing `q`
/// or closing the input ends the session normally.
#[allow(clippy::too_many_arguments)]
pub fn handle_play_command(
    hands: u32,
    seed: Option<u64>,
    seats: Option<usize>,
    delay_ms: Option<u64>,
    policy: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    if hands == 0 {
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }
    let cfg = resolve_config(seed, seats, policy)?;
    let delay = delay_ms.unwrap_or(cfg.opponent_delay_ms);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async {
        let table = spawn_table(
            cfg.table_config(),
            &cfg.policy,
            Pacing::from_millis(delay).without_auto_deal(),
        )?;
        writeln!(
            out,
            "Table: {} seats, blinds {}/{}, stack {}, seed {}",
            cfg.seats,
            cfg.small_blind,
            cfg.big_blind,
            cfg.starting_stack,
            cfg.seed.unwrap_or_default()
        )?;
        let mut session = Session {
            table: &table,
            events: table.subscribe().await?,
            last: None,
            played: 0,
        };
        let result = session.run(hands, out, err, stdin).await;
        let played = session.played;
        let _ = table.shutdown().await;

        writeln!(out, "Hands played: {}", played)?;
        result
    })
}

struct Session<'a> {
    table: &'a TableHandle,
    events: EventReceiver,
    last: Option<TableSnapshot>,
    played: u32,
}

impl Session<'_> {
    async fn run(
        &mut self,
        hands: u32,
        out: &mut dyn Write,
        err: &mut dyn Write,
        stdin: &mut dyn BufRead,
    ) -> Result<(), CliError> {
        let first = self.table.start_new_hand().await?;
        if first.hand_id == 0 {
            return Err(CliError::Engine("could not deal the first hand".to_string()));
        }

        loop {
            let event = self.next_event().await?;
            self.render(&event, out)?;
            let snapshot = event.snapshot;
            self.last = Some(snapshot.clone());

            if snapshot.phase == Phase::Showdown {
                if let Some(outcome) = &snapshot.outcome {
                    writeln!(out, "{}", format_table(&snapshot))?;
                    writeln!(out, "{}", format_outcome(outcome))?;
                }
                self.played += 1;
                if self.played >= hands {
                    return Ok(());
                }
                if !self.deal_next(&snapshot, out).await? {
                    return Ok(());
                }
                continue;
            }

            if snapshot.is_human_turn() && self.prompt(&snapshot, out, err, stdin).await? {
                writeln!(out, "You leave the table.")?;
                return Ok(());
            }
        }
    }

    async fn next_event(&mut self) -> Result<TableEvent, CliError> {
        self.events
            .recv()
            .await
            .ok_or_else(|| CliError::Engine("table closed".to_string()))
    }

    fn render(&self, event: &TableEvent, out: &mut dyn Write) -> Result<(), CliError> {
        let snap = &event.snapshot;
        match &event.cause {
            Transition::HandStarted => {
                writeln!(out)?;
                writeln!(out, "=== Hand #{} ===", snap.hand_id)?;
                writeln!(out, "{}", format_table(snap))?;
                return Ok(());
            }
            Transition::HumanAction { action } => {
                let to_call = self.owed_before(HUMAN_SEAT);
                writeln!(out, "You: {}", format_action(action, to_call))?;
            }
            Transition::OpponentAction { seat, action } => {
                let to_call = self.owed_before(*seat);
                let name = snap.seat(*seat).map(|s| s.name.as_str()).unwrap_or("?");
                writeln!(out, "{}: {}", name, format_action(action, to_call))?;
            }
        }
        let street_changed = self.last.as_ref().is_some_and(|l| l.phase != snap.phase);
        if street_changed && snap.is_live() {
            writeln!(
                out,
                "--- {} {} | Pot {} ---",
                snap.phase,
                format_board(&snap.community),
                snap.pot
            )?;
        }
        Ok(())
    }

    /// What `seat` owed before the event being rendered, capped at its stack.
    fn owed_before(&self, seat: usize) -> u32 {
        self.last
            .as_ref()
            .and_then(|l| l.seat(seat).map(|s| l.to_call(seat).min(s.stack)))
            .unwrap_or(0)
    }

    /// Deals the next hand unless the session cannot continue.
    async fn deal_next(
        &mut self,
        resolved: &TableSnapshot,
        out: &mut dyn Write,
    ) -> Result<bool, CliError> {
        let human_stack = resolved.seat(HUMAN_SEAT).map_or(0, |s| s.stack);
        if human_stack == 0 {
            writeln!(out, "You are out of chips.")?;
            return Ok(false);
        }
        let funded = resolved.seats.iter().filter(|s| s.stack > 0).count();
        if funded < 2 {
            writeln!(out, "Nobody left to play against.")?;
            return Ok(false);
        }
        let next = self.table.start_new_hand().await?;
        if next.hand_id == resolved.hand_id {
            return Err(CliError::Engine("could not deal the next hand".to_string()));
        }
        Ok(true)
    }

    /// Reads actions until one is accepted. Returns `true` when the player
    /// quits or the input ends instead.
    async fn prompt(
        &mut self,
        snapshot: &TableSnapshot,
        out: &mut dyn Write,
        err: &mut dyn Write,
        stdin: &mut dyn BufRead,
    ) -> Result<bool, CliError> {
        loop {
            write!(out, "Your turn ({}): ", format_choices(snapshot))?;
            out.flush()?;

            let Some(input) = read_stdin_line(stdin) else {
                writeln!(out)?;
                return Ok(true);
            };
            let action = match parse_player_action(&input) {
                ParseResult::Action(action) => action,
                ParseResult::AllIn => match resolve_all_in(snapshot) {
                    Some(action) => action,
                    None => continue,
                },
                ParseResult::Quit => return Ok(true),
                ParseResult::Invalid(msg) => {
                    ui::display_warning(err, &msg)?;
                    continue;
                }
            };
            if let Some(reason) = explain_rejection(snapshot, action) {
                ui::display_warning(err, &reason)?;
                continue;
            }

            let after = self.table.submit_action(action).await?;
            if after.seq == snapshot.seq && after.hand_id == snapshot.hand_id {
                ui::display_warning(err, &format!("{} was not accepted", action))?;
                continue;
            }
            return Ok(false);
        }
    }
}
