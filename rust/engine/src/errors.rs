use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid raise to {amount}, minimum is {minimum}")]
    InvalidRaise { amount: u32, minimum: u32 },
    #[error("Insufficient chips: needs {needed}, stack is {stack}")]
    InsufficientChips { needed: u32, stack: u32 },
    #[error("It's not seat {actual}'s turn (expected seat {expected})")]
    NotSeatsTurn { expected: usize, actual: usize },
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Hand already complete")]
    HandAlreadyComplete,
    #[error("Seat {0} has already folded")]
    SeatFolded(usize),
    #[error("Seat {0} already holds two hole cards")]
    HoleCardsFull(usize),
    #[error("Unknown seat {0}")]
    UnknownSeat(usize),
    #[error("Expected {expected} community cards, found {actual}")]
    CommunityCardMismatch { expected: usize, actual: usize },
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Only {funded} seat(s) have chips, need at least 2")]
    NotEnoughPlayers { funded: usize },
    #[error("Continuation is stale")]
    StaleContinuation,
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
}
