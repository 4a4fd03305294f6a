use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;
use crate::hand::HandRank;

/// Position label derived from a seat's clockwise offset from the button.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Position {
    Button,
    SmallBlind,
    BigBlind,
    UnderTheGun,
    Middle,
    Cutoff,
}

impl Position {
    /// `offset` is `(seat - button) mod seats`.
    pub fn for_offset(offset: usize, seats: usize) -> Self {
        match offset {
            0 => Position::Button,
            1 => Position::SmallBlind,
            2 => Position::BigBlind,
            o if o + 1 == seats => Position::Cutoff,
            3 => Position::UnderTheGun,
            _ => Position::Middle,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Button => "BTN",
            Position::SmallBlind => "SB",
            Position::BigBlind => "BB",
            Position::UnderTheGun => "UTG",
            Position::Middle => "MP",
            Position::Cutoff => "CO",
        }
    }
}

/// One chair at the table. Stack and id survive across hands; everything
/// else is reset when a new hand is dealt.
#[derive(Debug, Clone)]
pub struct Seat {
    pub(crate) id: usize,
    pub(crate) name: String,
    pub(crate) stack: u32,
    pub(crate) position: Position,
    pub(crate) active: bool,
    pub(crate) hole: Vec<Card>,
    pub(crate) bet: u32,
    pub(crate) total_bet: u32,
    pub(crate) hand_rank: Option<HandRank>,
}

impl Seat {
    pub fn new(id: usize, name: impl Into<String>, stack: u32) -> Self {
        Self {
            id,
            name: name.into(),
            stack,
            position: Position::Button,
            active: false,
            hole: Vec::with_capacity(2),
            bet: 0,
            total_bet: 0,
            hand_rank: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn position(&self) -> Position {
        self.position
    }
    pub fn is_active(&self) -> bool {
        self.active
    }
    pub fn hole_cards(&self) -> &[Card] {
        &self.hole
    }
    pub fn bet(&self) -> u32 {
        self.bet
    }
    pub fn total_bet(&self) -> u32 {
        self.total_bet
    }
    pub fn hand_rank(&self) -> Option<HandRank> {
        self.hand_rank
    }

    /// Still contesting the pot with nothing left to wager.
    pub fn is_all_in(&self) -> bool {
        self.active && self.stack == 0
    }

    /// Able to take a betting decision.
    pub fn can_act(&self) -> bool {
        self.active && self.stack > 0
    }

    /// Clears per-hand state. A seat without chips sits the hand out.
    pub(crate) fn reset_for_hand(&mut self) {
        self.active = self.stack > 0;
        self.hole.clear();
        self.bet = 0;
        self.total_bet = 0;
        self.hand_rank = None;
    }

    pub(crate) fn give_card(&mut self, card: Card) -> Result<(), GameError> {
        if self.hole.len() >= 2 {
            return Err(GameError::HoleCardsFull(self.id));
        }
        self.hole.push(card);
        Ok(())
    }

    /// Moves `amount` chips from the stack into the current bet.
    pub(crate) fn commit(&mut self, amount: u32) -> Result<(), GameError> {
        if amount > self.stack {
            return Err(GameError::InsufficientChips {
                needed: amount,
                stack: self.stack,
            });
        }
        self.stack -= amount;
        self.bet += amount;
        self.total_bet += amount;
        Ok(())
    }

    pub(crate) fn award(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }
}
