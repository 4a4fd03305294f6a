use dojo_engine::errors::GameError;
use thiserror::Error;

/// Failures seen by callers of a [`crate::actor::TableHandle`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Table actor has shut down")]
    TableClosed,
    #[error("Table actor dropped the reply")]
    ReplyDropped,
    #[error("Unknown opponent policy: {0}")]
    UnknownPolicy(String),
    #[error(transparent)]
    Engine(#[from] GameError),
}
