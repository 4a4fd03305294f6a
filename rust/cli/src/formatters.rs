//! Text rendering of cards, seats and table snapshots for the terminal.
//!
//! Suits print as `♥ ♦ ♣ ♠` where the terminal is known to handle them and
//! as `h d c s` otherwise. Everything here is a pure function of its input
//! so commands can render into any writer.
//!
//! ```rust
//! use dojo_engine::cards::{Card, Rank, Suit};
//! use dojo_cli::formatters::{format_board, format_card};
//!
//! let ace = Card::new(Rank::Ace, Suit::Spades);
//! assert!(format_card(&ace) == "A♠" || format_card(&ace) == "As");
//! assert!(format_board(&[ace]).starts_with("[A"));
//! ```

use dojo_engine::cards::{Card, Suit};
use dojo_engine::rules::Action;
use dojo_engine::table::{HandOutcome, SeatView, TableSnapshot, HUMAN_SEAT};

/// Check if the terminal supports Unicode card symbols.
///
/// On Windows, checks for Windows Terminal (WT_SESSION), modern terminals
/// (TERM_PROGRAM) or VS Code (VSCODE_INJECTION). Elsewhere assumes yes.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: Suit) -> String {
    if supports_unicode() {
        suit.symbol().to_string()
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
        .to_string()
    }
}

pub fn format_card(card: &Card) -> String {
    format!("{}{}", card.rank.label(), format_suit(card.suit))
}

/// Bracketed, space separated list such as `[A♠ K♥ Q♦]`, or `[]`.
pub fn format_board(cards: &[Card]) -> String {
    let formatted: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", formatted.join(" "))
}

/// Describes `action` taken by a seat currently owing `to_call`.
pub fn format_action(action: &Action, to_call: u32) -> String {
    match action {
        Action::Fold => "fold".to_string(),
        Action::Call if to_call == 0 => "check".to_string(),
        Action::Call => format!("call {}", to_call),
        Action::Raise(to) => format!("raise to {}", to),
    }
}

/// One line per seat: marker, name, position, stack, street bet and cards.
///
/// Opponent hole cards stay hidden until the hand reaches showdown with
/// the seat still contesting the pot.
pub fn format_seat(snapshot: &TableSnapshot, seat: &SeatView) -> String {
    let marker = if snapshot.active_player == Some(seat.id) && snapshot.is_live() {
        '>'
    } else {
        ' '
    };
    let reveal = seat.id == HUMAN_SEAT
        || (seat.active && snapshot.outcome.is_some() && !seat.hole_cards.is_empty());
    let cards = if seat.hole_cards.is_empty() {
        "--".to_string()
    } else if reveal {
        format_board(&seat.hole_cards)
    } else {
        "[?? ??]".to_string()
    };
    let status = if !seat.active && !seat.hole_cards.is_empty() {
        " folded"
    } else if seat.active && seat.stack == 0 && snapshot.is_live() {
        " all-in"
    } else if seat.hole_cards.is_empty() && snapshot.is_live() {
        " out"
    } else {
        ""
    };
    let rank = match (&seat.hand_rank, reveal) {
        (Some(rank), true) => format!(" ({})", rank.category.name()),
        _ => String::new(),
    };
    format!(
        "{} {:<8} {:<3} stack {:>6}  bet {:>5}  {}{}{}",
        marker,
        seat.name,
        seat.position.label(),
        seat.stack,
        seat.bet,
        cards,
        rank,
        status
    )
}

/// Multi-line view of the whole table.
pub fn format_table(snapshot: &TableSnapshot) -> String {
    let mut lines = vec![format!(
        "Hand #{} | {} | Board {} | Pot {}",
        snapshot.hand_id,
        snapshot.phase,
        format_board(&snapshot.community),
        snapshot.pot
    )];
    lines.extend(snapshot.seats.iter().map(|s| format_seat(snapshot, s)));
    lines.join("\n")
}

pub fn format_outcome(outcome: &HandOutcome) -> String {
    format!("*** {} ***", outcome.message)
}

/// The prompt hint listing what the human may do right now.
pub fn format_choices(snapshot: &TableSnapshot) -> String {
    let Some(legal) = snapshot.legal_actions(HUMAN_SEAT) else {
        return String::new();
    };
    let mut choices = vec!["fold".to_string()];
    if legal.to_call == 0 {
        choices.push("check".to_string());
    } else {
        choices.push(format!("call {}", legal.to_call));
    }
    if legal.can_raise {
        if legal.min_raise_to < legal.max_raise_to {
            choices.push(format!(
                "raise {}-{}",
                legal.min_raise_to, legal.max_raise_to
            ));
        }
        choices.push(format!("allin {}", legal.max_raise_to));
    }
    choices.push("q".to_string());
    choices.join(", ")
}
