use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::cards::Card;
use crate::errors::GameError;
use crate::hand::{Category, HandRank};
use crate::rules::Action;
use crate::seat::{Position, Seat};

/// The human always sits in chair 0.
pub const HUMAN_SEAT: usize = 0;

pub const MIN_SEATS: usize = 3;
pub const MAX_SEATS: usize = 10;

/// Static description of a table, fixed for the whole session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableConfig {
    pub seats: usize,
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Button position for the first hand.
    pub button: usize,
    pub seed: Option<u64>,
    /// One name per seat; empty means `"You"`, `"Bot 1"`, `"Bot 2"`...
    pub names: Vec<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: 6,
            starting_stack: 1_500,
            small_blind: 10,
            big_blind: 20,
            button: 0,
            seed: None,
            names: Vec::new(),
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.seats) {
            return Err(GameError::InvalidConfig(format!(
                "seats must be between {MIN_SEATS} and {MAX_SEATS}, got {}",
                self.seats
            )));
        }
        if self.small_blind == 0 || self.small_blind > self.big_blind {
            return Err(GameError::InvalidConfig(format!(
                "blinds must satisfy 0 < small <= big, got {}/{}",
                self.small_blind, self.big_blind
            )));
        }
        if self.starting_stack == 0 {
            return Err(GameError::InvalidConfig(
                "starting_stack must be > 0".into(),
            ));
        }
        // every chip on the table must fit in a u32 pot
        if self.seats as u64 * self.starting_stack as u64 > u32::MAX as u64 {
            return Err(GameError::InvalidConfig(format!(
                "{} seats of {} chips exceed the table chip limit of {}",
                self.seats,
                self.starting_stack,
                u32::MAX
            )));
        }
        if self.button >= self.seats {
            return Err(GameError::InvalidConfig(format!(
                "button {} is outside a {}-seat table",
                self.button, self.seats
            )));
        }
        if !self.names.is_empty() && self.names.len() != self.seats {
            return Err(GameError::InvalidConfig(format!(
                "expected {} seat names, got {}",
                self.seats,
                self.names.len()
            )));
        }
        Ok(())
    }

    pub fn seat_name(&self, id: usize) -> String {
        match self.names.get(id) {
            Some(name) => name.clone(),
            None if id == HUMAN_SEAT => "You".to_string(),
            None => format!("Bot {id}"),
        }
    }
}

/// Betting street, plus the two resting states around a hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No hand has been dealt yet.
    Idle,
    Preflop,
    Flop,
    Turn,
    River,
    /// The hand is resolved and the pot has been paid out.
    Showdown,
}

impl Phase {
    /// Community cards on the table while this phase is being bet.
    pub fn community_count(self) -> usize {
        match self {
            Phase::Idle | Phase::Preflop => 0,
            Phase::Flop => 3,
            Phase::Turn => 4,
            Phase::River | Phase::Showdown => 5,
        }
    }

    pub fn is_betting(self) -> bool {
        matches!(
            self,
            Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Preflop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub seat: usize,
    pub amount: u32,
}

/// The most recent action applied in the current hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAction {
    pub seat: usize,
    pub action: Action,
}

/// How the last hand ended. Present from resolution until the next deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandOutcome {
    /// Winning seats in ascending index order.
    pub winners: Vec<usize>,
    pub payouts: Vec<Payout>,
    /// `None` when everybody else folded.
    pub category: Option<Category>,
    pub message: String,
}

/// Mutable table state. Owned by the [`crate::engine::Engine`]; the betting
/// and showdown modules operate on it directly.
#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) seats: Vec<Seat>,
    pub(crate) button: usize,
    pub(crate) community: Vec<Card>,
    pub(crate) pot: u32,
    pub(crate) current_bet: u32,
    pub(crate) active_player: Option<usize>,
    pub(crate) phase: Phase,
    pub(crate) last_aggressor: Option<usize>,
    pub(crate) last_raise_amount: u32,
    pub(crate) acted: BTreeSet<usize>,
    pub(crate) last_action: Option<SeatAction>,
    pub(crate) outcome: Option<HandOutcome>,
    pub(crate) small_blind: u32,
    pub(crate) big_blind: u32,
}

impl Table {
    pub fn new(config: &TableConfig) -> Self {
        let seats = (0..config.seats)
            .map(|id| Seat::new(id, config.seat_name(id), config.starting_stack))
            .collect();
        let mut table = Self {
            seats,
            button: config.button,
            community: Vec::with_capacity(5),
            pot: 0,
            current_bet: 0,
            active_player: None,
            phase: Phase::Idle,
            last_aggressor: None,
            last_raise_amount: config.big_blind,
            acted: BTreeSet::new(),
            last_action: None,
            outcome: None,
            small_blind: config.small_blind,
            big_blind: config.big_blind,
        };
        table.sync_positions();
        table
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn seat(&self, id: usize) -> Result<&Seat, GameError> {
        self.seats.get(id).ok_or(GameError::UnknownSeat(id))
    }
    pub(crate) fn seat_mut(&mut self, id: usize) -> Result<&mut Seat, GameError> {
        self.seats.get_mut(id).ok_or(GameError::UnknownSeat(id))
    }
    pub fn button(&self) -> usize {
        self.button
    }
    pub fn community(&self) -> &[Card] {
        &self.community
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn active_player(&self) -> Option<usize> {
        self.active_player
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn outcome(&self) -> Option<&HandOutcome> {
        self.outcome.as_ref()
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Seats still contesting the pot.
    pub fn contenders(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| s.active)
    }

    /// First seat at or after `start` (clockwise) that satisfies `pred`.
    pub(crate) fn find_from(&self, start: usize, pred: impl Fn(&Seat) -> bool) -> Option<usize> {
        let n = self.seats.len();
        (0..n).map(|i| (start + i) % n).find(|&i| pred(&self.seats[i]))
    }

    pub(crate) fn sync_positions(&mut self) {
        let n = self.seats.len();
        let button = self.button;
        for seat in &mut self.seats {
            seat.position = Position::for_offset((seat.id + n - button) % n, n);
        }
    }

    /// Every card currently dealt to a seat or the board.
    pub(crate) fn cards_in_play(&self) -> Vec<Card> {
        self.seats
            .iter()
            .flat_map(|s| s.hole.iter().copied())
            .chain(self.community.iter().copied())
            .collect()
    }

    /// Checks the chip and turn invariants that must hold between transitions.
    pub fn check_invariants(&self) -> Result<(), String> {
        let committed: u32 = self.seats.iter().map(|s| s.total_bet).sum();
        if committed != self.pot {
            return Err(format!("pot {} != committed {}", self.pot, committed));
        }
        if self.phase.is_betting() {
            let max_bet = self.contenders().map(|s| s.bet).max().unwrap_or(0);
            if max_bet != self.current_bet {
                return Err(format!(
                    "current bet {} != highest active bet {}",
                    self.current_bet, max_bet
                ));
            }
            if let Some(idx) = self.active_player {
                if !self.seats[idx].active {
                    return Err(format!("seat {idx} is to act but has folded"));
                }
            }
        }
        if self.community.len() != self.phase.community_count() && self.phase != Phase::Showdown {
            return Err(format!(
                "{} community cards during {}",
                self.community.len(),
                self.phase
            ));
        }
        Ok(())
    }

    pub fn snapshot(&self, hand_id: u64, seq: u64) -> TableSnapshot {
        TableSnapshot {
            hand_id,
            seq,
            seats: self.seats.iter().map(SeatView::from).collect(),
            community: self.community.clone(),
            pot: self.pot,
            current_bet: self.current_bet,
            active_player: self.active_player,
            phase: self.phase,
            button: self.button,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            last_raise_amount: self.last_raise_amount,
            last_aggressor: self.last_aggressor,
            acted: self.acted.iter().copied().collect(),
            last_action: self.last_action,
            outcome: self.outcome.clone(),
        }
    }
}

/// Read-only copy of one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub id: usize,
    pub name: String,
    pub stack: u32,
    pub position: Position,
    pub active: bool,
    pub hole_cards: Vec<Card>,
    pub bet: u32,
    pub total_bet: u32,
    pub hand_rank: Option<HandRank>,
}

impl From<&Seat> for SeatView {
    fn from(seat: &Seat) -> Self {
        Self {
            id: seat.id,
            name: seat.name.clone(),
            stack: seat.stack,
            position: seat.position,
            active: seat.active,
            hole_cards: seat.hole.clone(),
            bet: seat.bet,
            total_bet: seat.total_bet,
            hand_rank: seat.hand_rank,
        }
    }
}

/// Bounds for the seat whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalActions {
    pub to_call: u32,
    /// Smallest legal full raise, as a total bet for the street.
    pub min_raise_to: u32,
    /// All-in total for the street.
    pub max_raise_to: u32,
    pub can_raise: bool,
}

/// Immutable view of the table published after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub hand_id: u64,
    pub seq: u64,
    pub seats: Vec<SeatView>,
    pub community: Vec<Card>,
    pub pot: u32,
    pub current_bet: u32,
    pub active_player: Option<usize>,
    pub phase: Phase,
    pub button: usize,
    pub small_blind: u32,
    pub big_blind: u32,
    pub last_raise_amount: u32,
    pub last_aggressor: Option<usize>,
    pub acted: Vec<usize>,
    pub last_action: Option<SeatAction>,
    pub outcome: Option<HandOutcome>,
}

impl TableSnapshot {
    pub fn is_live(&self) -> bool {
        self.phase.is_betting()
    }

    pub fn seat(&self, id: usize) -> Option<&SeatView> {
        self.seats.get(id)
    }

    pub fn is_human_turn(&self) -> bool {
        self.is_live() && self.active_player == Some(HUMAN_SEAT)
    }

    pub fn to_call(&self, id: usize) -> u32 {
        self.seat(id)
            .map(|s| self.current_bet.saturating_sub(s.bet))
            .unwrap_or(0)
    }

    pub fn min_raise_increment(&self) -> u32 {
        self.big_blind.max(self.last_raise_amount)
    }

    /// `None` unless `id` is the seat to act in a live hand.
    pub fn legal_actions(&self, id: usize) -> Option<LegalActions> {
        if !self.is_live() || self.active_player != Some(id) {
            return None;
        }
        let seat = self.seat(id)?;
        let max_raise_to = seat.stack + seat.bet;
        Some(LegalActions {
            to_call: self.to_call(id).min(seat.stack),
            min_raise_to: (self.current_bet + self.min_raise_increment()).min(max_raise_to),
            max_raise_to,
            can_raise: max_raise_to > self.current_bet,
        })
    }
}
