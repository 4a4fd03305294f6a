//! Coarse hand ranking by rank multiplicity.
//!
//! Only pairs, two pair, trips, full house and quads are recognised.
//! Straights and flushes are not detected and the numeric ranks 4 and 5 are
//! left unused so the ordering lines up with the standard category ladder.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::Card;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    FullHouse = 6,
    FourOfAKind = 7,
}

impl Category {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of [`evaluate`]. Two hands compare only by `rank`; there is no
/// kicker comparison.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRank {
    pub rank: u8,
    pub category: Category,
}

impl From<Category> for HandRank {
    fn from(category: Category) -> Self {
        Self {
            rank: category.rank(),
            category,
        }
    }
}

/// Ranks the union of hole and community cards.
///
/// Works with any number of community cards, so it doubles as a
/// partial-information estimate before the river.
///
/// ```
/// use dojo_engine::cards::{Card, Rank, Suit};
/// use dojo_engine::hand::{evaluate, Category};
///
/// let hole = [Card::new(Rank::Ace, Suit::Hearts), Card::new(Rank::Ace, Suit::Spades)];
/// let board = [Card::new(Rank::Ace, Suit::Clubs)];
/// assert_eq!(evaluate(&hole, &board).category, Category::ThreeOfAKind);
/// assert_eq!(evaluate(&hole, &[]).rank, 1);
/// ```
pub fn evaluate(hole: &[Card], community: &[Card]) -> HandRank {
    let counts = rank_counts(hole.iter().chain(community));
    categorize(&counts).into()
}

fn rank_counts<'a>(cards: impl Iterator<Item = &'a Card>) -> [u8; 15] {
    let mut counts = [0u8; 15]; // 2..=14 used
    for card in cards {
        counts[card.rank.value() as usize] += 1;
    }
    counts
}

fn categorize(counts: &[u8; 15]) -> Category {
    let (mut quads, mut trips, mut pairs) = (0, 0, 0);
    for &c in &counts[2..] {
        match c {
            4..=u8::MAX => quads += 1,
            3 => trips += 1,
            2 => pairs += 1,
            _ => {}
        }
    }

    if quads > 0 {
        Category::FourOfAKind
    } else if trips > 0 && (pairs > 0 || trips > 1) {
        // two sets of trips play as a full house
        Category::FullHouse
    } else if trips > 0 {
        Category::ThreeOfAKind
    } else if pairs >= 2 {
        Category::TwoPair
    } else if pairs == 1 {
        Category::Pair
    } else {
        Category::HighCard
    }
}
