use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::GameError;
use crate::table::{Phase, Table};

/// A betting decision. `Raise` carries the new total bet for the street
/// ("raise to"), not the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "lowercase")]
pub enum Action {
    Fold,
    /// Matches the current bet; a check when nothing is owed.
    Call,
    Raise(u32),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => f.write_str("fold"),
            Action::Call => f.write_str("call"),
            Action::Raise(to) => write!(f, "raise to {to}"),
        }
    }
}

/// Seats that posted the blinds for a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blinds {
    pub small: usize,
    pub big: usize,
}

/// Checks whether `seat` may take `action` right now.
///
/// # Errors
///
/// - [`GameError::NoHandInProgress`] / [`GameError::HandAlreadyComplete`] outside a betting street
/// - [`GameError::NotSeatsTurn`] when another seat is due to act
/// - [`GameError::SeatFolded`] when the seat is no longer in the hand
/// - [`GameError::InvalidRaise`] when a raise is not above the current bet, or
///   its increment is below `max(big blind, last raise)` without being all-in
/// - [`GameError::InsufficientChips`] when a raise exceeds the seat's stack
pub fn validate(table: &Table, seat: usize, action: Action) -> Result<(), GameError> {
    match table.phase {
        Phase::Idle => return Err(GameError::NoHandInProgress),
        Phase::Showdown => return Err(GameError::HandAlreadyComplete),
        _ => {}
    }
    let s = table.seat(seat)?;
    if table.active_player != Some(seat) {
        return Err(GameError::NotSeatsTurn {
            expected: table.active_player.unwrap_or(seat),
            actual: seat,
        });
    }
    if !s.active {
        return Err(GameError::SeatFolded(seat));
    }

    match action {
        Action::Fold => Ok(()),
        Action::Call => {
            let to_call = table.current_bet.saturating_sub(s.bet);
            // a short stack may call all-in for less
            if to_call == 0 || s.stack > 0 {
                Ok(())
            } else {
                Err(GameError::InsufficientChips {
                    needed: to_call,
                    stack: s.stack,
                })
            }
        }
        Action::Raise(amount) => {
            let minimum = min_raise_to(table);
            if amount <= table.current_bet || amount <= s.bet {
                return Err(GameError::InvalidRaise { amount, minimum });
            }
            let all_in = s.stack + s.bet;
            if amount > all_in {
                return Err(GameError::InsufficientChips {
                    needed: amount - s.bet,
                    stack: s.stack,
                });
            }
            if amount == all_in || amount >= minimum {
                Ok(())
            } else {
                Err(GameError::InvalidRaise { amount, minimum })
            }
        }
    }
}

/// Smallest full raise, as a street total.
pub fn min_raise_to(table: &Table) -> u32 {
    table.current_bet + table.big_blind.max(table.last_raise_amount)
}

/// Validates and applies `action` for `seat`, then marks the seat as acted.
///
/// Does not move the turn or advance the street; the caller does that once it
/// has checked for a fold-out or a completed round.
pub fn apply(table: &mut Table, seat: usize, action: Action) -> Result<(), GameError> {
    validate(table, seat, action)?;

    match action {
        Action::Fold => {
            table.seat_mut(seat)?.active = false;
        }
        Action::Call => {
            let current = table.current_bet;
            let s = table.seat_mut(seat)?;
            let chips = current.saturating_sub(s.bet).min(s.stack);
            s.commit(chips)?;
            table.pot += chips;
        }
        Action::Raise(amount) => {
            let previous = table.current_bet;
            let s = table.seat_mut(seat)?;
            let chips = amount - s.bet;
            s.commit(chips)?;
            let all_in = s.stack == 0;
            table.pot += chips;
            table.current_bet = amount;
            if !all_in {
                table.last_raise_amount = amount - previous;
            }
            table.last_aggressor = Some(seat);
            table.acted.clear();
        }
    }
    table.acted.insert(seat);
    Ok(())
}

/// Posts the blinds for a freshly dealt hand.
///
/// The small blind is the first funded seat after the button and the big blind
/// the next one after that. A short stack posts what it has. Both blinds count
/// as having acted and the big blind is the opening aggressor.
pub fn post_blinds(table: &mut Table) -> Result<Blinds, GameError> {
    let n = table.len();
    let small = table
        .find_from((table.button + 1) % n, |s| s.can_act())
        .ok_or(GameError::NotEnoughPlayers { funded: 0 })?;
    let big = table
        .find_from((small + 1) % n, |s| s.can_act())
        .filter(|&b| b != small)
        .ok_or(GameError::NotEnoughPlayers { funded: 1 })?;

    for (id, blind) in [(small, table.small_blind), (big, table.big_blind)] {
        let s = table.seat_mut(id)?;
        let chips = blind.min(s.stack);
        s.commit(chips)?;
        table.pot += chips;
        table.acted.insert(id);
    }
    table.current_bet = table.contenders().map(|s| s.bet).max().unwrap_or(0);
    table.last_raise_amount = table.big_blind;
    table.last_aggressor = Some(big);
    Ok(Blinds { small, big })
}

/// True once no further betting decision is needed on this street.
///
/// That is the case when a single contender is left, when every contender has
/// acted and matched the current bet (or is all-in), or when at most one
/// contender still has chips and it already matches the bet.
pub fn is_round_complete(table: &Table) -> bool {
    if table.contenders().count() <= 1 {
        return true;
    }
    let settled = table.contenders().all(|s| {
        s.is_all_in() || (table.acted.contains(&s.id) && s.bet == table.current_bet)
    });
    if settled {
        return true;
    }
    let mut can_act = table.contenders().filter(|s| s.can_act());
    match (can_act.next(), can_act.next()) {
        (None, _) => true,
        (Some(only), None) => only.bet >= table.current_bet,
        _ => false,
    }
}

/// Next seat clockwise from `from` that can still make a decision. Wraps
/// back to `from` itself when nobody else is eligible.
pub fn next_to_act(table: &Table, from: usize) -> Option<usize> {
    let n = table.len();
    table.find_from((from + 1) % n, |s| s.can_act())
}
