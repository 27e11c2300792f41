//! Move selection for all four games.
//!
//! Each game gets a selector implementing [`MoveSelector`]: depth-limited
//! alpha-beta for chess, checkers, and go, and a two-ply expectiminimax for
//! backgammon's chance layer. Selection never mutates game state and only
//! ever returns a move from the provided legal set.

pub mod backgammon;
pub mod chess;
pub mod checkers;
pub mod difficulty;
pub mod go;
pub mod search;

pub use backgammon::BackgammonAi;
pub use chess::ChessAi;
pub use checkers::CheckersAi;
pub use difficulty::{AiConfig, AiDifficulty};
pub use go::GoAi;
pub use search::{AdversarialGame, SearchContext};

use crate::core::{AiError, GameRng};

/// Move selection contract.
///
/// `choose_move` is deterministic for a fixed `(state, legal_moves, config)`
/// when the config carries a seed; without one, ties and jitter draw from
/// OS entropy.
pub trait MoveSelector {
    type State;
    type Move: Clone;

    /// Display name of the selector.
    fn name(&self) -> &'static str;

    /// Pick one of `legal_moves`. Errors when the slice is empty.
    fn choose_move(
        &self,
        state: &Self::State,
        legal_moves: &[Self::Move],
        config: &AiConfig,
    ) -> Result<Self::Move, AiError>;
}

/// RNG for one selection call: seeded from the config, or OS entropy.
pub(crate) fn selection_rng(config: &AiConfig) -> GameRng {
    match config.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    }
}
