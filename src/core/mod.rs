//! Shared leaf types: colors, coordinates, engine contract, errors, RNG,
//! and text-grid rendering.

pub mod color;
pub mod engine;
pub mod error;
pub mod grid;
pub mod rng;
pub mod square;

pub use color::Color;
pub use engine::{GameEngine, GameOutcome, TerminalStatus};
pub use error::{AiError, RulesError};
pub use rng::GameRng;
pub use square::Square;
