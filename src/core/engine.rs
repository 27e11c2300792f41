//! Rule-engine contract shared by all four games.
//!
//! Each game implements `GameEngine` over its own immutable state and move
//! types. Front ends hold a state, ask for legal moves, apply one, and loop
//! until `is_terminal` reports an outcome. Engines never accept a move that
//! is absent from the current legal set.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::error::RulesError;

/// Summary of a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Winning side, or `None` for a draw.
    pub winner: Option<Color>,
    /// Human-readable reason ("checkmate", "no moves", ...).
    pub reason: String,
}

impl GameOutcome {
    /// Outcome with a single winner.
    #[must_use]
    pub fn win(winner: Color, reason: impl Into<String>) -> Self {
        Self {
            winner: Some(winner),
            reason: reason.into(),
        }
    }

    /// Drawn outcome.
    #[must_use]
    pub fn draw(reason: impl Into<String>) -> Self {
        Self {
            winner: None,
            reason: reason.into(),
        }
    }
}

/// Terminal metadata for a game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalStatus {
    pub is_terminal: bool,
    pub outcome: Option<GameOutcome>,
}

impl TerminalStatus {
    /// The game continues.
    #[must_use]
    pub fn ongoing() -> Self {
        Self {
            is_terminal: false,
            outcome: None,
        }
    }

    /// The game ended with a winner.
    #[must_use]
    pub fn won(winner: Color, reason: impl Into<String>) -> Self {
        Self {
            is_terminal: true,
            outcome: Some(GameOutcome::win(winner, reason)),
        }
    }

    /// The game ended in a draw.
    #[must_use]
    pub fn drawn(reason: impl Into<String>) -> Self {
        Self {
            is_terminal: true,
            outcome: Some(GameOutcome::draw(reason)),
        }
    }

    /// Winning side, if the game is over and has one.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        self.outcome.as_ref().and_then(|outcome| outcome.winner)
    }
}

/// Rules engine contract.
///
/// ## Implementation Notes
///
/// - `legal_moves`: order is engine-defined but deterministic for a state
/// - `apply_move`: rejects moves not in the current legal set and leaves
///   the input state untouched on error
/// - `new_game`/`apply_move` take `&mut self` because the backgammon engine
///   owns a dice roller; the other engines are stateless
pub trait GameEngine {
    /// Immutable state value.
    type State: Clone;
    /// Game-specific move variant.
    type Move: Clone + PartialEq;

    /// Display name of the game.
    fn name(&self) -> &'static str;

    /// Create an initial game state.
    fn new_game(&mut self) -> Self::State;

    /// Enumerate the legal moves for the state.
    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Apply a move, producing the successor state.
    fn apply_move(
        &mut self,
        state: &Self::State,
        mv: &Self::Move,
    ) -> Result<Self::State, RulesError>;

    /// Terminal metadata for the state.
    fn is_terminal(&self, state: &Self::State) -> TerminalStatus;

    /// Human-readable board dump. Not machine-parseable.
    fn render(&self, state: &Self::State) -> String;
}
