//! # classic-boardgames
//!
//! Rule engines and adversarial-search AIs for four classic board games:
//! chess, checkers, backgammon, and go (9x9).
//!
//! ## Design Principles
//!
//! 1. **Immutable States**: Every state is a value; applying a move returns
//!    a new state. Boards use persistent vectors so cloning during search
//!    is O(1) with structural sharing.
//!
//! 2. **Explicit Randomness**: Dice and AI tie-breaking draw from an owned
//!    ChaCha8 generator. A seeded engine replays a whole game; a seeded
//!    `AiConfig` makes a selection call reproducible.
//!
//! 3. **Engines Never Trust Moves**: `apply_move` rejects anything outside
//!    the current legal set, so a front end cannot corrupt a position.
//!
//! ## Architecture
//!
//! - **Budgeted search**: depth-limited alpha-beta with node and wall-clock
//!   caps for chess, checkers, and go; two-ply expectiminimax over all 36
//!   dice outcomes for backgammon.
//!
//! - **Interface boundary**: states render to text for humans, and moves
//!   carry notation strings, but nothing here parses input or talks to a
//!   terminal.
//!
//! ## Modules
//!
//! - `core`: colors, coordinates, the `GameEngine` contract, errors, RNG,
//!   grid rendering
//! - `games`: the four rule engines
//! - `ai`: difficulty presets, shared search, per-game move selectors
pub mod ai;
pub mod core;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    AiError, Color, GameEngine, GameOutcome, GameRng, RulesError, Square, TerminalStatus,
};

pub use crate::games::{
    BackgammonEngine, BackgammonMove, BackgammonState, CheckersEngine, CheckersMove,
    CheckersState, ChessEngine, ChessMove, ChessState, GoEngine, GoMove, GoState,
};

pub use crate::ai::{
    AdversarialGame, AiConfig, AiDifficulty, BackgammonAi, CheckersAi, ChessAi, GoAi,
    MoveSelector, SearchContext,
};
