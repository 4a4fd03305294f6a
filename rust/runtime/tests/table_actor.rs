use std::time::Duration;

use dojo_engine::rules::Action;
use dojo_engine::table::{Phase, TableConfig};
use dojo_runtime::{spawn_table, EventReceiver, Pacing, RuntimeError, TableEvent, Transition};
use tokio::time::timeout;

fn config(seed: u64) -> TableConfig {
    TableConfig {
        seed: Some(seed),
        ..TableConfig::default()
    }
}

async fn next_event(rx: &mut EventReceiver) -> TableEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event in time")
        .expect("bus open")
}

async fn until_human_turn(rx: &mut EventReceiver) -> TableEvent {
    loop {
        let event = next_event(rx).await;
        if event.snapshot.is_human_turn() {
            return event;
        }
    }
}

#[tokio::test]
async fn opponents_act_until_human_is_due() {
    let table = spawn_table(config(1), "scripted", Pacing::instant()).expect("spawn");
    let mut rx = table.subscribe().await.expect("subscribe");

    let snap = table.start_new_hand().await.expect("deal");
    assert_eq!(snap.phase, Phase::Preflop);
    assert_eq!(snap.active_player, Some(3));

    let first = next_event(&mut rx).await;
    assert_eq!(first.cause, Transition::HandStarted);

    let due = until_human_turn(&mut rx).await;
    assert!(matches!(
        due.cause,
        Transition::OpponentAction { seat: 5, .. }
    ));
    assert_eq!(due.snapshot.seq, 3);
}

#[tokio::test]
async fn human_action_is_published() {
    let table = spawn_table(config(2), "passive", Pacing::instant()).expect("spawn");
    let mut rx = table.subscribe().await.expect("subscribe");
    table.start_new_hand().await.expect("deal");
    let due = until_human_turn(&mut rx).await;

    let snap = table.submit_action(Action::Call).await.expect("call");
    assert_eq!(snap.seq, due.snapshot.seq + 1);
    assert_eq!(snap.seats[0].bet, 20);

    let event = next_event(&mut rx).await;
    assert_eq!(
        event.cause,
        Transition::HumanAction {
            action: Action::Call
        }
    );
    assert_eq!(event.snapshot, snap);
}

#[tokio::test]
async fn out_of_turn_action_changes_nothing() {
    let pacing = Pacing {
        opponent_delay: Duration::from_secs(60),
        ..Pacing::instant()
    };
    let table = spawn_table(config(3), "scripted", pacing).expect("spawn");
    let before = table.start_new_hand().await.expect("deal");
    let after = table.submit_action(Action::Fold).await.expect("fold");
    assert_eq!(before, after);
    assert_eq!(table.snapshot().await.expect("snapshot"), before);
}

#[tokio::test(start_paused = true)]
async fn redeal_makes_pending_turn_stale() {
    let pacing = Pacing {
        opponent_delay: Duration::from_millis(100),
        ..Pacing::instant()
    }
    .without_auto_deal();
    let table = spawn_table(config(4), "passive", pacing).expect("spawn");
    let mut rx = table.subscribe().await.expect("subscribe");

    table.start_new_hand().await.expect("first deal");
    let second = table.start_new_hand().await.expect("second deal");
    assert_eq!(second.hand_id, 2);

    // both timers fire; only hand 2 may see opponent actions
    tokio::time::sleep(Duration::from_secs(1)).await;
    let mut opponent_actions = 0;
    while let Ok(event) = rx.try_recv() {
        if let Transition::OpponentAction { .. } = event.cause {
            assert_eq!(event.snapshot.hand_id, 2);
            opponent_actions += 1;
        }
    }
    // hand 2: button 1, UTG is seat 4, then 5 before the human
    assert_eq!(opponent_actions, 2);
    assert!(table.snapshot().await.expect("snapshot").is_human_turn());
}

#[tokio::test]
async fn hands_keep_chips_balanced() {
    let table = spawn_table(config(5), "scripted", Pacing::instant()).expect("spawn");
    let mut rx = table.subscribe().await.expect("subscribe");
    table.start_new_hand().await.expect("deal");

    let mut hands = 0;
    while hands < 5 {
        let event = next_event(&mut rx).await;
        let snap = &event.snapshot;
        let committed: u32 = snap.seats.iter().map(|s| s.total_bet).sum();
        assert_eq!(committed, snap.pot);
        let stacks: u32 = snap.seats.iter().map(|s| s.stack).sum();
        if snap.phase == Phase::Showdown {
            assert_eq!(stacks, 6 * 1_500);
        } else {
            assert_eq!(stacks + snap.pot, 6 * 1_500);
        }

        if event.cause == Transition::HandStarted {
            hands += 1;
        }
        if snap.is_human_turn() {
            table.submit_action(Action::Call).await.expect("call");
        }
    }
}

#[tokio::test]
async fn no_auto_deal_waits_for_caller() {
    let pacing = Pacing::instant().without_auto_deal();
    let table = spawn_table(config(6), "passive", pacing).expect("spawn");
    let mut rx = table.subscribe().await.expect("subscribe");
    table.start_new_hand().await.expect("deal");
    until_human_turn(&mut rx).await;

    let snap = table.submit_action(Action::Fold).await.expect("fold");
    assert!(!snap.seats[0].active);
    loop {
        let event = next_event(&mut rx).await;
        if event.snapshot.phase == Phase::Showdown {
            break;
        }
        if event.snapshot.is_human_turn() {
            panic!("folded human asked to act");
        }
    }
    let snap = table.snapshot().await.expect("snapshot");
    assert_eq!(snap.hand_id, 1);
    assert!(snap.outcome.is_some());

    let next = table.start_new_hand().await.expect("deal");
    assert_eq!(next.hand_id, 2);
}

#[tokio::test]
async fn unknown_policy_is_rejected() {
    let err = spawn_table(config(7), "shark", Pacing::instant()).expect_err("bad policy");
    assert!(matches!(err, RuntimeError::UnknownPolicy(name) if name == "shark"));
}

#[tokio::test]
async fn shutdown_closes_table() {
    let table = spawn_table(config(8), "passive", Pacing::instant()).expect("spawn");
    table.shutdown().await.expect("shutdown");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(table.snapshot().await.is_err());
}
