//! The table actor: a single task that owns the [`Engine`] and serializes
//! every mutation through its inbox.
//!
//! Human commands arrive through a [`TableHandle`]. Opponent turns and the
//! deal of the next hand are scheduled as delayed [`Continuation`]s that come
//! back into the same loop; a continuation that no longer matches the
//! engine's stamp is dropped.

use std::collections::HashMap;

use dojo_ai::{create_policy, OpponentPolicy};
use dojo_engine::engine::{Continuation, Engine, Step};
use dojo_engine::errors::GameError;
use dojo_engine::rules::Action;
use dojo_engine::table::{TableConfig, TableSnapshot, HUMAN_SEAT};
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;

use crate::errors::RuntimeError;
use crate::events::{EventReceiver, SnapshotBus, TableEvent, Transition};
use crate::settings::Pacing;

const INBOX_BUFFER: usize = 64;

pub enum TableCommand {
    StartNewHand {
        reply: oneshot::Sender<TableSnapshot>,
    },
    SubmitAction {
        action: Action,
        reply: oneshot::Sender<TableSnapshot>,
    },
    Snapshot {
        reply: oneshot::Sender<TableSnapshot>,
    },
    Subscribe {
        reply: oneshot::Sender<EventReceiver>,
    },
    Shutdown,
}

/// Cloneable front door to a running table.
#[derive(Debug, Clone)]
pub struct TableHandle {
    sender: mpsc::Sender<TableCommand>,
}

impl TableHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> TableCommand,
    ) -> Result<T, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(make(reply))
            .await
            .map_err(|_| RuntimeError::TableClosed)?;
        rx.await.map_err(|_| RuntimeError::ReplyDropped)
    }

    pub async fn start_new_hand(&self) -> Result<TableSnapshot, RuntimeError> {
        self.request(|reply| TableCommand::StartNewHand { reply })
            .await
    }

    /// Applies a human action. An illegal or out-of-turn action comes back
    /// as the unchanged snapshot.
    pub async fn submit_action(&self, action: Action) -> Result<TableSnapshot, RuntimeError> {
        self.request(|reply| TableCommand::SubmitAction { action, reply })
            .await
    }

    pub async fn snapshot(&self) -> Result<TableSnapshot, RuntimeError> {
        self.request(|reply| TableCommand::Snapshot { reply }).await
    }

    /// A stream of every transition from now on.
    pub async fn subscribe(&self) -> Result<EventReceiver, RuntimeError> {
        self.request(|reply| TableCommand::Subscribe { reply }).await
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.sender
            .send(TableCommand::Shutdown)
            .await
            .map_err(|_| RuntimeError::TableClosed)
    }
}

pub struct TableActor {
    engine: Engine,
    policies: HashMap<usize, Box<dyn OpponentPolicy>>,
    bus: SnapshotBus,
    pacing: Pacing,
    inbox: mpsc::Receiver<TableCommand>,
    timer_tx: mpsc::UnboundedSender<Continuation>,
    timer_rx: mpsc::UnboundedReceiver<Continuation>,
}

impl TableActor {
    /// `policies` maps every non-human seat to its decision function.
    pub fn new(
        engine: Engine,
        policies: HashMap<usize, Box<dyn OpponentPolicy>>,
        pacing: Pacing,
    ) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_BUFFER);
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let actor = Self {
            engine,
            policies,
            bus: SnapshotBus::new(),
            pacing,
            inbox,
            timer_tx,
            timer_rx,
        };
        (actor, TableHandle { sender })
    }

    /// Runs until shut down or until every handle is dropped.
    pub async fn run(mut self) {
        tracing::info!(
            seats = self.engine.config().seats,
            seed = self.engine.seed(),
            "table opened"
        );
        loop {
            tokio::select! {
                command = self.inbox.recv() => match command {
                    Some(TableCommand::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                Some(cont) = self.timer_rx.recv() => self.fire(cont),
            }
        }
        tracing::info!(hands = self.engine.hand_id(), "table closed");
    }

    fn handle(&mut self, command: TableCommand) {
        match command {
            TableCommand::StartNewHand { reply } => {
                let before = self.engine.stamp();
                let snapshot = self.engine.start_new_hand();
                if self.engine.stamp() != before {
                    self.publish(Transition::HandStarted, snapshot.clone());
                }
                let _ = reply.send(snapshot);
            }
            TableCommand::SubmitAction { action, reply } => {
                let before = self.engine.stamp();
                let snapshot = self.engine.submit_action(action);
                if self.engine.stamp() != before {
                    self.publish(Transition::HumanAction { action }, snapshot.clone());
                }
                let _ = reply.send(snapshot);
            }
            TableCommand::Snapshot { reply } => {
                let _ = reply.send(self.engine.snapshot());
            }
            TableCommand::Subscribe { reply } => {
                let _ = reply.send(self.bus.subscribe());
            }
            TableCommand::Shutdown => {}
        }
    }

    fn fire(&mut self, cont: Continuation) {
        let policies = &mut self.policies;
        let result = self.engine.resume(&cont, |snapshot, seat| {
            match policies.get_mut(&seat) {
                Some(policy) => policy.decide(snapshot, seat),
                None => {
                    tracing::warn!(seat, "no policy for seat, checking");
                    Action::Call
                }
            }
        });

        match (result, cont.step) {
            (Ok(snapshot), Step::NextHand) => self.publish(Transition::HandStarted, snapshot),
            (Ok(snapshot), Step::OpponentTurn { seat }) => {
                let action = snapshot
                    .last_action
                    .map(|a| a.action)
                    .unwrap_or(Action::Call);
                self.publish(Transition::OpponentAction { seat, action }, snapshot)
            }
            (Err(GameError::StaleContinuation), _) => {
                tracing::debug!(stamp = ?cont.stamp, "stale continuation ignored");
            }
            (Err(err), step) => {
                tracing::error!(%err, ?step, "scheduled step failed");
            }
        }
    }

    fn publish(&mut self, cause: Transition, snapshot: TableSnapshot) {
        self.bus.broadcast(TableEvent { cause, snapshot });
        self.schedule();
    }

    /// Arms a timer for whatever the engine wants done next.
    fn schedule(&self) {
        let Some(cont) = self.engine.pending() else {
            return;
        };
        let delay = match cont.step {
            Step::OpponentTurn { .. } => self.pacing.opponent_delay,
            Step::NextHand if self.pacing.auto_deal => self.pacing.next_hand_delay,
            Step::NextHand => return,
        };
        tracing::debug!(step = ?cont.step, delay_ms = delay.as_millis() as u64, "continuation scheduled");
        let tx = self.timer_tx.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            // the actor may have shut down meanwhile
            let _ = tx.send(cont);
        });
    }
}

/// Builds an engine from `config`, seats `policy` at every non-human chair
/// and spawns the actor on the current runtime.
///
/// Policy seeds derive from the table seed so a seeded table replays.
pub fn spawn_table(
    config: TableConfig,
    policy: &str,
    pacing: Pacing,
) -> Result<TableHandle, RuntimeError> {
    let engine = Engine::new(config)?;
    let seed = engine.seed();
    let mut policies = HashMap::new();
    for seat in (0..engine.config().seats).filter(|&s| s != HUMAN_SEAT) {
        let policy = create_policy(policy, Some(seed.wrapping_add(seat as u64)))
            .ok_or_else(|| RuntimeError::UnknownPolicy(policy.to_string()))?;
        policies.insert(seat, policy);
    }
    let (actor, handle) = TableActor::new(engine, policies, pacing);
    tokio::spawn(actor.run());
    Ok(handle)
}
