//! Chess move selection: depth-limited alpha-beta over a material and
//! mobility evaluation.

use crate::core::{AiError, Color, Square};
use crate::games::chess::{ChessMove, ChessState, PieceKind};

use super::difficulty::AiConfig;
use super::search::{alpha_beta, pick_move, AdversarialGame, SearchContext};
use super::{selection_rng, MoveSelector};

const SCORE_JITTER: f64 = 0.05;
const CENTER_SQUARES: [(u8, u8); 4] = [(3, 3), (3, 4), (4, 3), (4, 4)];

fn piece_value(kind: PieceKind) -> f64 {
    match kind {
        PieceKind::Pawn => 1.0,
        PieceKind::Knight => 3.0,
        PieceKind::Bishop => 3.25,
        PieceKind::Rook => 5.0,
        PieceKind::Queen => 9.0,
        PieceKind::King => 0.0,
    }
}

/// Alpha-beta chess selector.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChessAi;

impl ChessAi {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Material balance plus pawn-advancement, center, and mobility bonuses,
    /// from `ai_color`'s perspective.
    fn material_score(&self, state: &ChessState, ai_color: Color) -> f64 {
        let mut score = 0.0;
        for square in Square::all() {
            let Some(piece) = state.board.get(square) else {
                continue;
            };
            let mut value = piece_value(piece.kind);
            if piece.kind == PieceKind::Pawn {
                let advance = match piece.color {
                    Color::White => 6u8.saturating_sub(square.row()),
                    Color::Black => square.row().saturating_sub(1),
                };
                value += f64::from(advance) * 0.05;
            }
            if piece.kind != PieceKind::King
                && CENTER_SQUARES.contains(&(square.row(), square.col()))
            {
                value += 0.1;
            }
            if piece.color == ai_color {
                score += value;
            } else {
                score -= value;
            }
        }
        score
    }

    fn mobility_score(&self, state: &ChessState, ai_color: Color) -> f64 {
        let ai_moves = state.with_active_color(ai_color).legal_moves().len();
        let opp_moves = state
            .with_active_color(ai_color.opponent())
            .legal_moves()
            .len();
        ai_moves as f64 - opp_moves as f64
    }
}

impl AdversarialGame for ChessAi {
    type State = ChessState;
    type Move = ChessMove;

    fn legal_moves(&self, state: &ChessState) -> Vec<ChessMove> {
        state.legal_moves()
    }

    fn apply(&self, state: &ChessState, mv: &ChessMove) -> ChessState {
        state.apply(mv)
    }

    fn status(&self, state: &ChessState) -> crate::core::TerminalStatus {
        state.status()
    }

    fn active_color(&self, state: &ChessState) -> Color {
        state.active_color
    }

    fn evaluate(&self, state: &ChessState, ai_color: Color) -> f64 {
        self.material_score(state, ai_color) + 0.05 * self.mobility_score(state, ai_color)
    }
}

impl MoveSelector for ChessAi {
    type State = ChessState;
    type Move = ChessMove;

    fn name(&self) -> &'static str {
        "Chess AI"
    }

    fn choose_move(
        &self,
        state: &ChessState,
        legal_moves: &[ChessMove],
        config: &AiConfig,
    ) -> Result<ChessMove, AiError> {
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
    use crate::games::chess::{Board, CastlingRights, Piece};

    fn sq(coord: &str) -> Square {
        Square::from_algebraic(coord).unwrap()
    }

    fn state_from(board: Board, active_color: Color) -> ChessState {
        ChessState {
            board,
            active_color,
            castling_rights: CastlingRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove: 1,
        }
    }

    #[test]
    fn test_material_symmetry() {
        let ai = ChessAi::new();
        let state = ChessState::initial();
        let white = ai.material_score(&state, Color::White);
        let black = ai.material_score(&state, Color::Black);
        assert!((white + black).abs() < 1e-9);
    }

    #[test]
    fn test_prefers_hanging_queen_capture() {
        // White rook on a1 can take an undefended queen on a8.
        let board = Board::empty()
            .with(sq("a1"), Some(Piece::new(Color::White, PieceKind::Rook)))
            .with(sq("a8"), Some(Piece::new(Color::Black, PieceKind::Queen)))
            .with(sq("e1"), Some(Piece::new(Color::White, PieceKind::King)))
            .with(sq("e6"), Some(Piece::new(Color::Black, PieceKind::King)));
        let state = state_from(board, Color::White);
        let moves = state.legal_moves();

        let ai = ChessAi::new();
        let config = AiConfig::new(AiDifficulty::intermediate()).with_seed(5);
        let chosen = ai.choose_move(&state, &moves, &config).unwrap();
        assert_eq!(chosen.to, sq("a8"));
    }

    #[test]
    fn test_finds_mate_in_one() {
        // Back-rank mate: Rd1-d8#.
        let board = Board::empty()
            .with(sq("d1"), Some(Piece::new(Color::White, PieceKind::Rook)))
            .with(sq("g1"), Some(Piece::new(Color::White, PieceKind::King)))
            .with(sq("g8"), Some(Piece::new(Color::Black, PieceKind::King)))
            .with(sq("f7"), Some(Piece::new(Color::Black, PieceKind::Pawn)))
            .with(sq("g7"), Some(Piece::new(Color::Black, PieceKind::Pawn)))
            .with(sq("h7"), Some(Piece::new(Color::Black, PieceKind::Pawn)));
        let state = state_from(board, Color::White);
        let moves = state.legal_moves();

        let ai = ChessAi::new();
        let config = AiConfig::new(AiDifficulty::intermediate()).with_seed(1);
        let chosen = ai.choose_move(&state, &moves, &config).unwrap();
        let next = state.apply(&chosen);
        assert_eq!(next.status().winner(), Some(Color::White));
    }

    #[test]
    fn test_seeded_choice_is_reproducible() {
        let ai = ChessAi::new();
        let state = ChessState::initial();
        let moves = state.legal_moves();
        let config = AiConfig::new(AiDifficulty::easy()).with_seed(42);

        let first = ai.choose_move(&state, &moves, &config).unwrap();
        let second = ai.choose_move(&state, &moves, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_moves_is_an_error() {
        let ai = ChessAi::new();
        let state = ChessState::initial();
        let config = AiConfig::default();
        assert_eq!(
            ai.choose_move(&state, &[], &config),
            Err(AiError::NoLegalMoves)
        );
    }
}
