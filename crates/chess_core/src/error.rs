//! Error taxonomy for move validation and game control.
//!
//! Every variant is recoverable: a rejected move leaves the game untouched.

use crate::types::{PieceKind, Square};

/// Why a proposed move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("invalid move format: {0}")]
    InvalidFormat(String),

    #[error("move outside board")]
    OutOfBounds,

    #[error("cannot capture your own piece")]
    SameColorCapture,

    #[error("path is blocked")]
    PathBlocked,

    #[error("invalid {0} move")]
    WrongPieceShape(PieceKind),

    #[error("move would leave own king in check")]
    SelfCheck,

    #[error("not your turn: {0}")]
    WrongTurn(String),

    #[error("no piece on {0}")]
    EmptySquare(Square),
}

/// Errors surfaced by the game state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveError),

    #[error("engine {engine} produced an illegal move: {reason}")]
    IllegalEngineMove { engine: String, reason: MoveError },

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),
}
