use tracing::debug;

use crate::hand::{evaluate, HandRank};
use crate::table::{HandOutcome, Payout, Phase, Table};

/// Splits `pot` evenly across `winners` (already in seat order); the odd
/// chips go to the first winner.
pub fn split_pot(pot: u32, winners: &[usize]) -> Vec<Payout> {
    if winners.is_empty() {
        return Vec::new();
    }
    let share = pot / winners.len() as u32;
    let remainder = pot % winners.len() as u32;
    winners
        .iter()
        .enumerate()
        .map(|(i, &seat)| Payout {
            seat,
            amount: if i == 0 { share + remainder } else { share },
        })
        .collect()
}

/// Awards the whole pot to the last contender standing.
pub(crate) fn resolve_fold_out(table: &mut Table) -> Option<HandOutcome> {
    let winner = table.contenders().next().map(|s| s.id)?;
    let pot = table.pot;
    let seat = table.seat_mut(winner).ok()?;
    seat.award(pot);
    let message = format!("{} wins {} (everyone else folded)", seat.name, pot);

    let outcome = HandOutcome {
        winners: vec![winner],
        payouts: vec![Payout {
            seat: winner,
            amount: pot,
        }],
        category: None,
        message,
    };
    finish(table, outcome.clone());
    Some(outcome)
}

/// Ranks every contender and pays the best rank.
pub(crate) fn resolve_showdown(table: &mut Table) -> Option<HandOutcome> {
    let community = table.community.clone();
    let mut best: Option<HandRank> = None;
    for seat in table.seats.iter_mut().filter(|s| s.active) {
        let rank = evaluate(&seat.hole, &community);
        debug!(seat = seat.id, category = %rank.category, "showdown hand");
        seat.hand_rank = Some(rank);
        match best {
            Some(b) if b.rank >= rank.rank => {}
            _ => best = Some(rank),
        }
    }
    let best = best?;

    let winners: Vec<usize> = table
        .contenders()
        .filter(|s| s.hand_rank.is_some_and(|r| r.rank == best.rank))
        .map(|s| s.id)
        .collect();
    let payouts = split_pot(table.pot, &winners);
    for payout in &payouts {
        table.seat_mut(payout.seat).ok()?.award(payout.amount);
    }

    let message = if let [only] = payouts.as_slice() {
        format!(
            "{} wins {} with {}",
            table.seats[only.seat].name, only.amount, best.category
        )
    } else {
        let shares: Vec<String> = payouts
            .iter()
            .map(|p| format!("{} ({})", table.seats[p.seat].name, p.amount))
            .collect();
        format!("Split pot: {} with {}", shares.join(", "), best.category)
    };

    let outcome = HandOutcome {
        winners,
        payouts,
        category: Some(best.category),
        message,
    };
    finish(table, outcome.clone());
    Some(outcome)
}

fn finish(table: &mut Table, outcome: HandOutcome) {
    table.phase = Phase::Showdown;
    table.active_player = None;
    table.outcome = Some(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};
    use crate::hand::Category;
    use crate::table::TableConfig;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn river_table(pot_each: u32) -> Table {
        let mut table = Table::new(&TableConfig {
            seats: 3,
            ..TableConfig::default()
        });
        for seat in &mut table.seats {
            seat.reset_for_hand();
            seat.commit(pot_each).unwrap();
        }
        table.pot = pot_each * 3;
        table.phase = Phase::River;
        table
    }

    #[test]
    fn split_gives_remainder_to_first_winner() {
        let payouts = split_pot(100, &[0, 1, 2]);
        let amounts: Vec<u32> = payouts.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![34, 33, 33]);
    }

    #[test]
    fn three_way_tie_splits_in_seat_order() {
        let mut table = river_table(100);
        table.pot = 100;
        for seat in &mut table.seats {
            seat.total_bet = 0;
        }
        table.seats[0].total_bet = 34;
        table.seats[1].total_bet = 33;
        table.seats[2].total_bet = 33;
        // every seat pairs the king on board, no other pair available
        table.community = vec![
            c(Rank::King, Suit::Clubs),
            c(Rank::Nine, Suit::Diamonds),
            c(Rank::Seven, Suit::Hearts),
            c(Rank::Four, Suit::Spades),
            c(Rank::Two, Suit::Clubs),
        ];
        table.seats[0].hole = vec![c(Rank::King, Suit::Hearts), c(Rank::Three, Suit::Hearts)];
        table.seats[1].hole = vec![c(Rank::King, Suit::Spades), c(Rank::Five, Suit::Hearts)];
        table.seats[2].hole = vec![c(Rank::King, Suit::Diamonds), c(Rank::Six, Suit::Spades)];
        let stacks: Vec<u32> = table.seats.iter().map(|s| s.stack).collect();

        let outcome = resolve_showdown(&mut table).unwrap();
        assert_eq!(outcome.winners, vec![0, 1, 2]);
        assert_eq!(outcome.category, Some(Category::Pair));
        let won: Vec<u32> = table
            .seats
            .iter()
            .zip(&stacks)
            .map(|(s, before)| s.stack - before)
            .collect();
        assert_eq!(won, vec![34, 33, 33]);
        assert!(outcome.message.starts_with("Split pot: You (34)"));
        assert_eq!(table.phase, Phase::Showdown);
        assert_eq!(table.active_player, None);
    }

    #[test]
    fn best_rank_takes_whole_pot() {
        let mut table = river_table(50);
        table.community = vec![
            c(Rank::Queen, Suit::Clubs),
            c(Rank::Nine, Suit::Diamonds),
            c(Rank::Seven, Suit::Hearts),
            c(Rank::Four, Suit::Spades),
            c(Rank::Two, Suit::Clubs),
        ];
        table.seats[0].hole = vec![c(Rank::Ace, Suit::Hearts), c(Rank::Three, Suit::Hearts)];
        table.seats[1].hole = vec![c(Rank::Nine, Suit::Spades), c(Rank::Nine, Suit::Hearts)];
        table.seats[2].hole = vec![c(Rank::Queen, Suit::Spades), c(Rank::Five, Suit::Hearts)];

        let outcome = resolve_showdown(&mut table).unwrap();
        assert_eq!(outcome.winners, vec![1]);
        assert_eq!(table.seats[1].stack, 1_450 + 150);
        assert_eq!(outcome.message, "Bot 1 wins 150 with Three of a Kind");
        assert_eq!(
            table.seats[1].hand_rank.map(|r| r.category),
            Some(Category::ThreeOfAKind)
        );
    }

    #[test]
    fn fold_out_pays_last_contender_without_evaluation() {
        let mut table = river_table(40);
        table.seats[0].active = false;
        table.seats[1].active = false;
        let outcome = resolve_fold_out(&mut table).unwrap();
        assert_eq!(outcome.winners, vec![2]);
        assert_eq!(outcome.category, None);
        assert_eq!(table.seats[2].stack, 1_460 + 120);
        assert!(table.seats.iter().all(|s| s.hand_rank.is_none()));
        assert_eq!(outcome.message, "Bot 2 wins 120 (everyone else folded)");
    }
}
