use dojo_engine::rules::Action;
use dojo_engine::table::TableSnapshot;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

// A subscriber that falls this far behind starts missing snapshots
const EVENT_CHANNEL_BUFFER: usize = 256;

pub type EventReceiver = mpsc::Receiver<TableEvent>;

/// What caused a published snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transition {
    HandStarted,
    HumanAction { action: Action },
    OpponentAction { seat: usize, action: Action },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEvent {
    pub cause: Transition,
    pub snapshot: TableSnapshot,
}

/// Fan-out of table events to any number of listeners.
///
/// Owned by the table actor, so it needs no locking. Listeners whose
/// receiver has been dropped are pruned on the next broadcast.
#[derive(Debug, Default)]
pub struct SnapshotBus {
    subscribers: Vec<(usize, mpsc::Sender<TableEvent>)>,
    next_id: usize,
}

impl SnapshotBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> EventReceiver {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, tx));
        tracing::debug!(subscriber_id = id, "listener subscribed to table events");
        rx
    }

    pub fn broadcast(&mut self, event: TableEvent) {
        tracing::debug!(
            hand_id = event.snapshot.hand_id,
            seq = event.snapshot.seq,
            cause = ?event.cause,
            "broadcasting table event"
        );

        let mut closed = Vec::new();
        for (id, sender) in &self.subscribers {
            match sender.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(subscriber_id = id, "subscriber lagging, event dropped");
                }
                Err(TrySendError::Closed(_)) => closed.push(*id),
            }
        }
        if !closed.is_empty() {
            self.subscribers.retain(|(id, _)| !closed.contains(id));
            tracing::debug!(removed = closed.len(), "pruned closed subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dojo_engine::engine::Engine;
    use dojo_engine::table::TableConfig;

    fn event() -> TableEvent {
        let mut engine = Engine::new(TableConfig {
            seed: Some(1),
            ..TableConfig::default()
        })
        .unwrap();
        TableEvent {
            cause: Transition::HandStarted,
            snapshot: engine.start_new_hand(),
        }
    }

    #[test]
    fn broadcast_reaches_all_subscribers() {
        let mut bus = SnapshotBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.broadcast(event());

        let ev1 = rx1.try_recv().expect("rx1 event");
        let ev2 = rx2.try_recv().expect("rx2 event");
        assert_eq!(ev1.cause, Transition::HandStarted);
        assert_eq!(ev1, ev2);
    }

    #[test]
    fn dropped_receiver_is_pruned() {
        let mut bus = SnapshotBus::new();
        let rx = bus.subscribe();
        let _kept = bus.subscribe();
        drop(rx);
        bus.broadcast(event());
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn full_subscriber_is_kept() {
        let mut bus = SnapshotBus::new();
        let mut rx = bus.subscribe();
        let ev = event();
        for _ in 0..EVENT_CHANNEL_BUFFER + 5 {
            bus.broadcast(ev.clone());
        }
        assert_eq!(bus.subscriber_count(), 1);
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, EVENT_CHANNEL_BUFFER);
    }

    #[test]
    fn transition_serializes_with_tag() {
        let json = serde_json::to_string(&Transition::OpponentAction {
            seat: 3,
            action: Action::Raise(40),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"opponent_action","seat":3,"action":{"type":"raise","amount":40}}"#
        );
    }
}
