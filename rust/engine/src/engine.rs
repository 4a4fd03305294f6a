use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::rules::{self, Action};
use crate::showdown;
use crate::table::{Phase, SeatAction, Table, TableConfig, TableSnapshot, HUMAN_SEAT};

/// Identifies one engine state. `hand_id` grows with every deal and `seq`
/// with every transition inside a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub hand_id: u64,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// A scripted seat is due to act.
    OpponentTurn { seat: usize },
    /// The hand is resolved; deal the next one.
    NextHand,
}

/// Work the engine wants done without human input, tagged with the state it
/// was computed from. Resuming it after any other transition is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continuation {
    pub stamp: Stamp,
    pub step: Step,
}

/// Owns the table and deck for one session and drives every hand through
/// its streets.
///
/// All mutation goes through `&mut self`, so a single owner serializes the
/// human's actions and the scheduled continuations.
///
/// ```
/// use dojo_engine::engine::Engine;
/// use dojo_engine::table::{Phase, TableConfig};
///
/// let mut engine = Engine::new(TableConfig { seed: Some(7), ..TableConfig::default() }).unwrap();
/// let snap = engine.start_new_hand();
/// assert_eq!(snap.phase, Phase::Preflop);
/// assert_eq!(snap.pot, 30);
/// assert_eq!(snap.active_player, Some(3));
/// ```
#[derive(Debug)]
pub struct Engine {
    config: TableConfig,
    table: Table,
    deck: Deck,
    seed: u64,
    hand_id: u64,
    seq: u64,
}

impl Engine {
    pub fn new(config: TableConfig) -> Result<Self, GameError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        debug!(seed, seats = config.seats, "engine created");
        Ok(Self {
            table: Table::new(&config),
            deck: Deck::new_with_seed(seed),
            config,
            seed,
            hand_id: 0,
            seq: 0,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn table(&self) -> &Table {
        &self.table
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn hand_id(&self) -> u64 {
        self.hand_id
    }

    pub fn stamp(&self) -> Stamp {
        Stamp {
            hand_id: self.hand_id,
            seq: self.seq,
        }
    }

    pub fn snapshot(&self) -> TableSnapshot {
        self.table.snapshot(self.hand_id, self.seq)
    }

    /// Seats with chips left.
    pub fn funded_seats(&self) -> usize {
        self.table.seats().iter().filter(|s| s.stack() > 0).count()
    }

    /// Deals a new hand and posts the blinds. Refusals are logged and leave
    /// the table as it was.
    pub fn start_new_hand(&mut self) -> TableSnapshot {
        if let Err(err) = self.try_start_new_hand() {
            error!(%err, "could not start a new hand");
        }
        self.snapshot()
    }

    pub fn try_start_new_hand(&mut self) -> Result<TableSnapshot, GameError> {
        let funded = self.funded_seats();
        if funded < 2 {
            return Err(GameError::NotEnoughPlayers { funded });
        }
        let before = self.table.clone();
        if let Err(err) = self.deal() {
            self.table = before;
            return Err(err);
        }
        self.hand_id += 1;
        self.seq = 0;
        info!(
            hand_id = self.hand_id,
            button = self.table.button,
            active = ?self.table.active_player,
            "hand started"
        );
        Ok(self.snapshot())
    }

    fn deal(&mut self) -> Result<(), GameError> {
        let t = &mut self.table;
        if t.phase.is_betting() {
            // abandoning a live hand hands every commitment back
            warn!(hand_id = self.hand_id, "restarting over a live hand");
            for seat in &mut t.seats {
                seat.award(seat.total_bet);
            }
        }
        if self.hand_id > 0 {
            t.button = (t.button + 1) % t.seats.len();
        }
        t.sync_positions();
        for seat in &mut t.seats {
            seat.reset_for_hand();
        }
        t.community.clear();
        t.pot = 0;
        t.current_bet = 0;
        t.acted.clear();
        t.last_aggressor = None;
        t.last_raise_amount = t.big_blind;
        t.last_action = None;
        t.outcome = None;
        t.phase = Phase::Preflop;

        self.deck.shuffle();
        for _ in 0..2 {
            for id in 0..self.table.len() {
                if self.table.seats[id].active {
                    let card = self.draw()?;
                    self.table.seat_mut(id)?.give_card(card)?;
                }
            }
        }

        let blinds = rules::post_blinds(&mut self.table)?;
        debug!(small = blinds.small, big = blinds.big, "blinds posted");
        self.table.active_player = rules::next_to_act(&self.table, blinds.big);
        if rules::is_round_complete(&self.table) {
            self.advance_street()?;
        }
        Ok(())
    }

    /// Applies a human action. Ignored, with the current snapshot returned,
    /// when it is not the human's turn or the action is illegal.
    pub fn submit_action(&mut self, action: Action) -> TableSnapshot {
        if self.table.active_player != Some(HUMAN_SEAT) || !self.table.phase.is_betting() {
            debug!(?action, active = ?self.table.active_player, "human action out of turn ignored");
            return self.snapshot();
        }
        match self.apply(HUMAN_SEAT, action) {
            Ok(snap) => snap,
            Err(err) => {
                warn!(%err, ?action, "human action rejected");
                self.snapshot()
            }
        }
    }

    /// Applies `action` for `seat` and carries the hand forward. On error
    /// nothing changes.
    pub fn apply(&mut self, seat: usize, action: Action) -> Result<TableSnapshot, GameError> {
        let before = self.table.clone();
        match self.act(seat, action) {
            Ok(()) => {
                self.seq += 1;
                Ok(self.snapshot())
            }
            Err(err) => {
                self.table = before;
                Err(err)
            }
        }
    }

    fn act(&mut self, seat: usize, action: Action) -> Result<(), GameError> {
        rules::apply(&mut self.table, seat, action)?;
        self.table.last_action = Some(SeatAction { seat, action });
        debug!(
            hand_id = self.hand_id,
            seat,
            %action,
            pot = self.table.pot,
            current_bet = self.table.current_bet,
            "action applied"
        );

        if self.table.contenders().count() == 1 {
            if let Some(outcome) = showdown::resolve_fold_out(&mut self.table) {
                info!(hand_id = self.hand_id, "{}", outcome.message);
            }
            return Ok(());
        }

        let complete = rules::is_round_complete(&self.table);
        debug!(phase = %self.table.phase, complete, "round check");
        if complete {
            self.advance_street()
        } else {
            self.table.active_player = rules::next_to_act(&self.table, seat);
            debug!(next = ?self.table.active_player, "next to act");
            Ok(())
        }
    }

    /// Moves to the next street, repeating while nobody is left to bet, and
    /// settles the hand after the river.
    fn advance_street(&mut self) -> Result<(), GameError> {
        loop {
            let (next, expected, deal) = match self.table.phase {
                Phase::Preflop => (Phase::Flop, 0, 3),
                Phase::Flop => (Phase::Turn, 3, 1),
                Phase::Turn => (Phase::River, 4, 1),
                Phase::River => {
                    if let Some(outcome) = showdown::resolve_showdown(&mut self.table) {
                        info!(hand_id = self.hand_id, "{}", outcome.message);
                    }
                    return Ok(());
                }
                Phase::Idle | Phase::Showdown => return Err(GameError::NoHandInProgress),
            };

            let actual = self.table.community.len();
            if actual != expected {
                error!(expected, actual, phase = %next, "community cards out of step");
                return Err(GameError::CommunityCardMismatch { expected, actual });
            }
            let cards = (0..deal)
                .map(|_| self.draw())
                .collect::<Result<Vec<Card>, GameError>>()?;

            let t = &mut self.table;
            for seat in &mut t.seats {
                seat.bet = 0;
            }
            t.acted.clear();
            t.last_aggressor = None;
            t.current_bet = 0;
            t.last_raise_amount = t.big_blind;
            t.community.extend(cards);
            t.phase = next;
            let n = t.len();
            t.active_player = t.find_from((t.button + 1) % n, |s| s.can_act());
            debug!(phase = %next, board = t.community.len(), first = ?t.active_player, "street dealt");

            if !rules::is_round_complete(&self.table) {
                return Ok(());
            }
        }
    }

    fn draw(&mut self) -> Result<Card, GameError> {
        match self.deck.draw() {
            Ok(card) => Ok(card),
            Err(_) => {
                warn!("deck exhausted, rebuilding from cards not in play");
                self.deck.rebuild_without(&self.table.cards_in_play());
                self.deck.draw()
            }
        }
    }

    /// The automatic step due from the current state, if any. The human's
    /// turn and a finished session have none.
    pub fn pending(&self) -> Option<Continuation> {
        let step = match self.table.phase {
            Phase::Showdown if self.funded_seats() >= 2 => Step::NextHand,
            p if p.is_betting() => match self.table.active_player {
                Some(seat) if seat != HUMAN_SEAT => Step::OpponentTurn { seat },
                _ => return None,
            },
            _ => return None,
        };
        Some(Continuation {
            stamp: self.stamp(),
            step,
        })
    }

    /// Runs a continuation produced by [`Engine::pending`].
    ///
    /// `decide` picks the action for an opponent turn. An illegal pick falls
    /// back to a call.
    ///
    /// # Errors
    ///
    /// [`GameError::StaleContinuation`] if the engine has moved on since the
    /// continuation was issued.
    pub fn resume<F>(&mut self, cont: &Continuation, decide: F) -> Result<TableSnapshot, GameError>
    where
        F: FnOnce(&TableSnapshot, usize) -> Action,
    {
        if cont.stamp != self.stamp() || self.pending().as_ref() != Some(cont) {
            debug!(stale = ?cont.stamp, current = ?self.stamp(), "continuation dropped");
            return Err(GameError::StaleContinuation);
        }
        match cont.step {
            Step::NextHand => self.try_start_new_hand(),
            Step::OpponentTurn { seat } => {
                let action = decide(&self.snapshot(), seat);
                match self.apply(seat, action) {
                    Ok(snap) => Ok(snap),
                    Err(err) => {
                        warn!(seat, %action, %err, "opponent action rejected, calling instead");
                        self.apply(seat, Action::Call)
                            .or_else(|_| self.apply(seat, Action::Fold))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableConfig;

    fn engine(seed: u64) -> Engine {
        Engine::new(TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn nothing_pending_before_first_hand() {
        let e = engine(1);
        assert_eq!(e.pending(), None);
        assert_eq!(e.snapshot().phase, Phase::Idle);
    }

    #[test]
    fn opponent_turn_is_pending_after_deal() {
        let mut e = engine(1);
        e.start_new_hand();
        assert_eq!(
            e.pending().map(|c| c.step),
            Some(Step::OpponentTurn { seat: 3 })
        );
    }

    #[test]
    fn stale_continuation_is_refused() {
        let mut e = engine(2);
        e.start_new_hand();
        let cont = e.pending().unwrap();
        e.resume(&cont, |_, _| Action::Call).unwrap();
        let before = e.snapshot();
        assert_eq!(
            e.resume(&cont, |_, _| Action::Call),
            Err(GameError::StaleContinuation)
        );
        assert_eq!(e.snapshot(), before);
    }

    #[test]
    fn illegal_policy_pick_falls_back_to_call() {
        let mut e = engine(3);
        e.start_new_hand();
        let cont = e.pending().unwrap();
        let snap = e.resume(&cont, |_, _| Action::Raise(21)).unwrap();
        assert_eq!(snap.seats[3].bet, 20);
        assert_eq!(snap.active_player, Some(4));
    }

    #[test]
    fn rejected_action_leaves_state_untouched() {
        let mut e = engine(4);
        e.start_new_hand();
        let before = e.snapshot();
        assert!(e.apply(3, Action::Raise(25)).is_err());
        assert_eq!(e.snapshot(), before);
    }

    #[test]
    fn button_rotates_each_hand() {
        let mut e = engine(5);
        assert_eq!(e.start_new_hand().button, 0);
        assert_eq!(e.start_new_hand().button, 1);
        assert_eq!(e.start_new_hand().button, 2);
    }

    #[test]
    fn restart_mid_hand_returns_commitments() {
        let mut e = engine(6);
        e.start_new_hand();
        let snap = e.start_new_hand();
        let total: u32 = snap.seats.iter().map(|s| s.stack).sum::<u32>() + snap.pot;
        assert_eq!(total, 6 * 1_500);
    }

    #[test]
    fn exhausted_deck_is_rebuilt_for_the_flop() {
        let mut e = engine(8);
        e.start_new_hand();
        while e.deck.draw().is_ok() {}

        while e.table.phase == Phase::Preflop {
            let seat = e.table.active_player.unwrap();
            e.apply(seat, Action::Call).unwrap();
        }
        assert_eq!(e.table.phase, Phase::Flop);
        assert_eq!(e.table.community.len(), 3);

        let in_play = e.table.cards_in_play();
        let distinct: std::collections::HashSet<_> = in_play.iter().collect();
        assert_eq!(distinct.len(), in_play.len());
        assert_eq!(in_play.len(), 6 * 2 + 3);
    }
}
