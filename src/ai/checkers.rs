//! Checkers move selection: alpha-beta over a material, advancement, and
//! mobility evaluation.

use crate::core::{AiError, Color, Square};
use crate::games::checkers::{CheckerKind, CheckersMove, CheckersState};

use super::difficulty::AiConfig;
use super::search::{alpha_beta, pick_move, AdversarialGame, SearchContext};
use super::{selection_rng, MoveSelector};

const SCORE_JITTER: f64 = 0.05;
const KING_VALUE: f64 = 1.75;

/// Alpha-beta checkers selector.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckersAi;

impl CheckersAi {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn material_score(&self, state: &CheckersState, ai_color: Color) -> f64 {
        let mut score = 0.0;
        for square in Square::all() {
            let Some(checker) = state.board.get(square) else {
                continue;
            };
            let value = match checker.kind {
                CheckerKind::King => KING_VALUE,
                CheckerKind::Man => {
                    // Men gain value as they approach the king row.
                    let advance = match checker.color {
                        Color::White => 7 - square.row(),
                        Color::Black => square.row(),
                    };
                    1.0 + f64::from(advance) * 0.05
                }
            };
            if checker.color == ai_color {
                score += value;
            } else {
                score -= value;
            }
        }
        score
    }

    fn mobility_score(&self, state: &CheckersState, ai_color: Color) -> f64 {
        let as_color = |color| CheckersState {
            board: state.board.clone(),
            active_color: color,
        };
        let ai_moves = as_color(ai_color).legal_moves().len();
        let opp_moves = as_color(ai_color.opponent()).legal_moves().len();
        ai_moves as f64 - opp_moves as f64
    }
}

impl AdversarialGame for CheckersAi {
    type State = CheckersState;
    type Move = CheckersMove;

    fn legal_moves(&self, state: &CheckersState) -> Vec<CheckersMove> {
        state.legal_moves()
    }

    fn apply(&self, state: &CheckersState, mv: &CheckersMove) -> CheckersState {
        state.apply(mv)
    }

    fn status(&self, state: &CheckersState) -> crate::core::TerminalStatus {
        state.status()
    }

    fn active_color(&self, state: &CheckersState) -> Color {
        state.active_color
    }

    fn evaluate(&self, state: &CheckersState, ai_color: Color) -> f64 {
        self.material_score(state, ai_color) + 0.1 * self.mobility_score(state, ai_color)
    }
}

impl MoveSelector for CheckersAi {
    type State = CheckersState;
    type Move = CheckersMove;

    fn name(&self) -> &'static str {
        "Checkers AI"
    }

    fn choose_move(
        &self,
        state: &CheckersState,
        legal_moves: &[CheckersMove],
        config: &AiConfig,
    ) -> Result<CheckersMove, AiError> {
        let ai_color = state.active_color;
        let depth = config.difficulty.max_depth.saturating_sub(1);
        let mut ctx = SearchContext::new(&config.difficulty);
        let mut rng = selection_rng(config);

        pick_move(legal_moves, SCORE_JITTER, &mut rng, |mv| {
            let next = state.apply(mv);
            alpha_beta(
                self,
                &next,
                depth,
                f64::NEG_INFINITY,
                f64::INFINITY,
                ai_color,
                &mut ctx,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::difficulty::AiDifficulty;
    use crate::games::checkers::{Board, Checker};

    fn sq(coord: &str) -> Square {
        Square::from_algebraic(coord).unwrap()
    }

    fn man(color: Color) -> Option<Checker> {
        Some(Checker::new(color, CheckerKind::Man))
    }

    #[test]
    fn test_initial_evaluation_is_balanced() {
        let ai = CheckersAi::new();
        let state = CheckersState::initial();
        let score = ai.evaluate(&state, Color::Black);
        assert!(score.abs() < 1e-9);
    }

    #[test]
    fn test_takes_the_longer_jump() {
        // One branch captures a single man, the other captures two; both
        // are legal (only maximal sequences per jump, not globally), and
        // the double capture evaluates higher.
        let board = Board::empty()
            .with(sq("d2"), man(Color::White))
            .with(sq("c3"), man(Color::Black))
            .with(sq("e3"), man(Color::Black))
            .with(sq("e5"), man(Color::Black));
        let state = CheckersState {
            board,
            active_color: Color::White,
        };
        let moves = state.legal_moves();
        assert!(moves.len() > 1);

        let ai = CheckersAi::new();
        let config = AiConfig::new(AiDifficulty::intermediate()).with_seed(9);
        let chosen = ai.choose_move(&state, &moves, &config).unwrap();
        assert_eq!(chosen.captures.len(), 2);
    }

    #[test]
    fn test_seeded_choice_is_reproducible() {
        let ai = CheckersAi::new();
        let state = CheckersState::initial();
        let moves = state.legal_moves();
        let config = AiConfig::new(AiDifficulty::easy()).with_seed(3);

        let first = ai.choose_move(&state, &moves, &config).unwrap();
        let second = ai.choose_move(&state, &moves, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_moves_is_an_error() {
        let ai = CheckersAi::new();
        let state = CheckersState::initial();
        assert_eq!(
            ai.choose_move(&state, &[], &AiConfig::default()),
            Err(AiError::NoLegalMoves)
        );
    }
}
