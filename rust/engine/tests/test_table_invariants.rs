use std::collections::HashSet;

use dojo_engine::engine::Engine;
use dojo_engine::rules::Action;
use dojo_engine::table::{Phase, TableConfig, TableSnapshot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn check(eng: &Engine, total_chips: u32) {
    let snap = eng.snapshot();
    eng.table()
        .check_invariants()
        .unwrap_or_else(|e| panic!("hand {} seq {}: {e}", snap.hand_id, snap.seq));

    let committed: u32 = snap.seats.iter().map(|s| s.total_bet).sum();
    assert_eq!(committed, snap.pot);

    let stacks: u32 = snap.seats.iter().map(|s| s.stack).sum();
    if snap.phase == Phase::Showdown {
        // pot already paid out but still reported
        assert_eq!(stacks, total_chips);
    } else {
        assert_eq!(stacks + snap.pot, total_chips);
    }

    if snap.is_live() {
        let idx = snap.active_player.expect("someone to act in a live hand");
        assert!(snap.seats[idx].active);
        assert!(snap.seats[idx].stack > 0);
    }

    assert_distinct_cards(&snap);
}

fn assert_distinct_cards(snap: &TableSnapshot) {
    let mut seen = HashSet::new();
    for card in snap
        .seats
        .iter()
        .flat_map(|s| s.hole_cards.iter())
        .chain(snap.community.iter())
    {
        assert!(seen.insert(*card), "duplicate card {card}");
    }
    assert!(seen.len() <= 2 * snap.seats.len() + 5);
}

fn random_action(rng: &mut ChaCha20Rng, snap: &TableSnapshot, seat: usize) -> Action {
    let Some(legal) = snap.legal_actions(seat) else {
        return Action::Call;
    };
    match rng.random_range(0..10) {
        0 => Action::Fold,
        1 if legal.can_raise => Action::Raise(legal.max_raise_to),
        2 | 3 if legal.can_raise => Action::Raise(legal.min_raise_to),
        4 => Action::Raise(legal.min_raise_to.saturating_sub(1)),
        _ => Action::Call,
    }
}

#[test]
fn random_play_preserves_chips_and_turn_order() {
    for seed in 0..40u64 {
        let seats = 3 + (seed as usize % 8);
        let mut eng = Engine::new(TableConfig {
            seats,
            seed: Some(seed),
            ..TableConfig::default()
        })
        .expect("valid config");
        let total = 1_500 * seats as u32;
        let mut rng = ChaCha20Rng::seed_from_u64(seed ^ 0xD0_D0);

        for _ in 0..25 {
            if eng.try_start_new_hand().is_err() {
                break;
            }
            check(&eng, total);
            let mut steps = 0;
            while eng.snapshot().is_live() {
                let snap = eng.snapshot();
                let seat = snap.active_player.expect("seat to act");
                let action = random_action(&mut rng, &snap, seat);
                if eng.apply(seat, action).is_err() {
                    // rejected picks must not change anything
                    assert_eq!(eng.snapshot(), snap);
                    eng.apply(seat, Action::Call).expect("call is always legal");
                }
                check(&eng, total);
                steps += 1;
                assert!(steps < 500, "hand did not terminate");
            }
        }
    }
}

#[test]
fn same_seed_replays_identically() {
    let run = |seed| {
        let mut eng = Engine::new(TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        })
        .expect("valid config");
        let mut snaps = Vec::new();
        for _ in 0..5 {
            eng.start_new_hand();
            while let Some(cont) = eng.pending() {
                if !eng.snapshot().is_live() {
                    break;
                }
                snaps.push(eng.resume(&cont, |_, _| Action::Call).expect("resume"));
            }
            if eng.snapshot().is_human_turn() {
                snaps.push(eng.submit_action(Action::Fold));
            }
        }
        snaps
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn rejects_too_few_funded_seats() {
    let mut eng = Engine::new(TableConfig {
        seats: 3,
        starting_stack: 20,
        seed: Some(1),
        ..TableConfig::default()
    })
    .expect("valid config");
    // play all-in hands until only one seat has chips
    for _ in 0..100 {
        if eng.try_start_new_hand().is_err() {
            break;
        }
        while eng.snapshot().is_live() {
            let seat = eng.snapshot().active_player.expect("seat to act");
            eng.apply(seat, Action::Call).expect("call");
        }
    }
    assert_eq!(eng.funded_seats(), 1);
    assert!(eng.pending().is_none());
    let before = eng.snapshot();
    assert_eq!(eng.start_new_hand(), before);
}
