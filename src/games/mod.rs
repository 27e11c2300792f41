//! The four rule engines. Each module owns its state, move, and engine
//! types and exposes the shared [`GameEngine`](crate::core::GameEngine)
//! contract.

pub mod backgammon;
pub mod chess;
pub mod checkers;
pub mod go;

pub use backgammon::{BackgammonEngine, BackgammonMove, BackgammonState};
pub use chess::{ChessEngine, ChessMove, ChessState};
pub use checkers::{CheckersEngine, CheckersMove, CheckersState};
pub use go::{GoEngine, GoMove, GoState};
