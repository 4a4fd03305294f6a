use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// A seeded 52-card deck dealt from the top.
///
/// The RNG lives for the whole session so every hand gets a fresh
/// permutation while a fixed seed still reproduces the full sequence.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            cards: full_deck(),
            position: 0,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Rebuilds the full 52 cards and applies a uniform permutation.
    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        let card = self
            .cards
            .get(self.position)
            .copied()
            .ok_or(GameError::DeckExhausted)?;
        self.position += 1;
        Ok(card)
    }

    /// Recreates the deck from every card not currently in play and
    /// reshuffles it. Used when a draw would otherwise fail.
    pub fn rebuild_without(&mut self, in_play: &[Card]) {
        self.cards = full_deck()
            .into_iter()
            .filter(|c| !in_play.contains(c))
            .collect();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn draining_yields_52_unique_then_exhausts() {
        let mut deck = Deck::new_with_seed(7);
        deck.shuffle();
        let mut seen = HashSet::new();
        for _ in 0..52 {
            assert!(seen.insert(deck.draw().expect("card available")));
        }
        assert_eq!(deck.remaining(), 0);
        assert_eq!(deck.draw(), Err(GameError::DeckExhausted));
    }

    #[test]
    fn rebuild_skips_cards_in_play() {
        let mut deck = Deck::new_with_seed(3);
        deck.shuffle();
        let in_play: Vec<Card> = (0..10).map(|_| deck.draw().unwrap()).collect();
        deck.rebuild_without(&in_play);
        assert_eq!(deck.remaining(), 42);
        while let Ok(card) = deck.draw() {
            assert!(!in_play.contains(&card));
        }
    }
}
