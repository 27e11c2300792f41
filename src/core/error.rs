//! Error types for the engine and AI boundaries.

use thiserror::Error;

/// Rejection of an illegal move or placement.
///
/// Engines leave the input state unchanged when returning these; the caller
/// is expected to re-prompt or reject.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    /// The move is not in `legal_moves` for the given state.
    #[error("move is not legal in the current position")]
    IllegalMove,
    /// Go: the target point already holds a stone.
    #[error("point is already occupied")]
    Occupied,
    /// Go: the placed group would end with zero liberties.
    #[error("placement would be suicide")]
    Suicide,
    /// Go: the placement would exactly recreate the previous board.
    #[error("placement violates the ko rule")]
    KoViolation,
}

/// Contract violations in AI move selection.
///
/// These indicate a programming error in the caller, not a recoverable game
/// condition: callers must check for no-legal-moves/pass/forfeit before
/// invoking selection.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AiError {
    #[error("cannot choose a move from an empty legal move set")]
    NoLegalMoves,
}
