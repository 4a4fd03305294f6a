//! Parsing of typed table commands and explanations for refused actions.

use dojo_engine::rules::Action;
use dojo_engine::table::{TableSnapshot, HUMAN_SEAT};

/// Outcome of parsing one line typed at the action prompt.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    /// A betting action ready for the engine
    Action(Action),
    /// Push the whole stack; resolved against the live snapshot
    AllIn,
    /// User entered quit command (q or quit)
    Quit,
    /// Invalid input with error message
    Invalid(String),
}

/// Parse user input into a betting action or a special command.
///
/// Accepted forms (case-insensitive):
/// - `f` / `fold`
/// - `c` / `call` / `k` / `check`
/// - `r N` / `raise N` / `bet N`, where `N` is the new total bet for the street
/// - `a` / `allin` / `all-in`
/// - `q` / `quit`
///
/// ```rust
/// use dojo_cli::validation::{parse_player_action, ParseResult};
/// use dojo_engine::rules::Action;
///
/// assert_eq!(parse_player_action("fold"), ParseResult::Action(Action::Fold));
/// assert_eq!(parse_player_action("raise 60"), ParseResult::Action(Action::Raise(60)));
/// assert_eq!(parse_player_action("q"), ParseResult::Quit);
/// match parse_player_action("dance") {
///     ParseResult::Invalid(msg) => assert!(msg.contains("Unrecognized")),
///     _ => panic!("Expected Invalid"),
/// }
/// ```
pub fn parse_player_action(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some(&verb) = parts.first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    match verb {
        "q" | "quit" => ParseResult::Quit,
        "fold" | "f" => ParseResult::Action(Action::Fold),
        "call" | "c" | "check" | "k" => ParseResult::Action(Action::Call),
        "allin" | "all-in" | "a" => ParseResult::AllIn,
        "raise" | "r" | "bet" => {
            let Some(amount) = parts.get(1) else {
                return ParseResult::Invalid(
                    "Raise requires an amount (e.g., 'raise 60')".to_string(),
                );
            };
            match amount.parse::<u32>() {
                Ok(to) if to > 0 => ParseResult::Action(Action::Raise(to)),
                Ok(_) => ParseResult::Invalid("Raise amount must be positive".to_string()),
                Err(_) => ParseResult::Invalid(format!("Invalid raise amount '{}'", amount)),
            }
        }
        other => ParseResult::Invalid(format!(
            "Unrecognized action '{}'. Valid actions: fold, check, call, raise <amount>, allin, q",
            other
        )),
    }
}

/// Turns [`ParseResult::AllIn`] into a concrete action for the human seat:
/// a raise to the whole stack, or a call when the stack cannot cover more
/// than the current bet.
pub fn resolve_all_in(snapshot: &TableSnapshot) -> Option<Action> {
    let legal = snapshot.legal_actions(HUMAN_SEAT)?;
    Some(if legal.can_raise {
        Action::Raise(legal.max_raise_to)
    } else {
        Action::Call
    })
}

/// Why the engine would refuse `action` from the human in `snapshot`, or
/// `None` if it is legal.
///
/// The engine answers an illegal action with the unchanged snapshot, so the
/// prompt uses this to tell the player what went wrong.
pub fn explain_rejection(snapshot: &TableSnapshot, action: Action) -> Option<String> {
    let Some(legal) = snapshot.legal_actions(HUMAN_SEAT) else {
        return Some("It is not your turn".to_string());
    };
    match action {
        Action::Fold | Action::Call => None,
        Action::Raise(_) if !legal.can_raise => {
            Some("You cannot raise, your stack only covers a call".to_string())
        }
        Action::Raise(to) if to > legal.max_raise_to => Some(format!(
            "You can raise to at most {} (all-in)",
            legal.max_raise_to
        )),
        Action::Raise(to) if to < legal.min_raise_to => Some(format!(
            "Minimum raise is to {} (you can also go all-in for {})",
            legal.min_raise_to, legal.max_raise_to
        )),
        Action::Raise(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dojo_engine::engine::Engine;
    use dojo_engine::table::TableConfig;

    fn human_turn() -> TableSnapshot {
        let mut engine = Engine::new(TableConfig {
            seed: Some(3),
            ..TableConfig::default()
        })
        .unwrap();
        engine.start_new_hand();
        // seats 3, 4 and 5 act before the human
        for seat in 3..6 {
            engine.apply(seat, Action::Call).unwrap();
        }
        let snap = engine.snapshot();
        assert!(snap.is_human_turn());
        snap
    }

    #[test]
    fn parses_aliases() {
        assert_eq!(parse_player_action("F"), ParseResult::Action(Action::Fold));
        assert_eq!(parse_player_action("check"), ParseResult::Action(Action::Call));
        assert_eq!(parse_player_action("k"), ParseResult::Action(Action::Call));
        assert_eq!(parse_player_action("bet 80"), ParseResult::Action(Action::Raise(80)));
        assert_eq!(parse_player_action("All-In"), ParseResult::AllIn);
        assert_eq!(parse_player_action(" quit "), ParseResult::Quit);
    }

    #[test]
    fn raise_needs_positive_amount() {
        assert_eq!(
            parse_player_action("raise"),
            ParseResult::Invalid("Raise requires an amount (e.g., 'raise 60')".to_string())
        );
        assert!(matches!(parse_player_action("raise 0"), ParseResult::Invalid(_)));
        assert!(matches!(parse_player_action("raise lots"), ParseResult::Invalid(_)));
        assert_eq!(
            parse_player_action(""),
            ParseResult::Invalid("Empty input".to_string())
        );
    }

    #[test]
    fn explains_short_raise() {
        let snap = human_turn();
        let msg = explain_rejection(&snap, Action::Raise(30)).unwrap();
        assert_eq!(msg, "Minimum raise is to 40 (you can also go all-in for 1500)");
        assert!(explain_rejection(&snap, Action::Raise(40)).is_none());
        assert!(explain_rejection(&snap, Action::Raise(1_501)).is_some());
        assert!(explain_rejection(&snap, Action::Call).is_none());
    }

    #[test]
    fn all_in_raises_whole_stack() {
        let snap = human_turn();
        assert_eq!(resolve_all_in(&snap), Some(Action::Raise(1_500)));
    }

    #[test]
    fn nothing_is_legal_off_turn() {
        let mut engine = Engine::new(TableConfig::default()).unwrap();
        let snap = engine.start_new_hand();
        assert_eq!(resolve_all_in(&snap), None);
        assert_eq!(
            explain_rejection(&snap, Action::Fold).as_deref(),
            Some("It is not your turn")
        );
    }
}
