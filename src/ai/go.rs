//! Go move selection: alpha-beta over a pruned candidate set.
//!
//! The branching factor makes a full-width search hopeless, so moves are
//! ranked by a cheap placement heuristic and only the top candidates are
//! searched. The leaf evaluation combines area score, captures, liberties,
//! and atari counts.

use crate::core::{AiError, Color};
use crate::games::go::{GoMove, GoState, BOARD_SIZE};

use super::difficulty::AiConfig;
use super::search::{alpha_beta, pick_move, AdversarialGame, SearchContext};
use super::{selection_rng, MoveSelector};

const SCORE_JITTER: f64 = 0.2;
const CANDIDATE_LIMIT: usize = 12;
const PASS_SCORE: f64 = -0.5;

/// Candidate-pruned alpha-beta go selector.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoAi;

impl GoAi {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Cheap placement heuristic used only for move ordering: centrality,
    /// contact with both colors, and immediate captures.
    fn quick_score(&self, state: &GoState, mv: &GoMove) -> f64 {
        let Some(coord) = mv.point else {
            return PASS_SCORE;
        };

        let center = (BOARD_SIZE as f64 - 1.0) / 2.0;
        let center_distance =
            (f64::from(coord.row()) - center).abs() + (f64::from(coord.col()) - center).abs();
        let mut score = -0.05 * center_distance;

        let opponent = state.active_color.opponent();
        let mut adjacent_opponent = 0;
        let mut adjacent_friend = 0;
        for neighbor in coord.neighbors() {
            match state.board.get(neighbor) {
                Some(color) if color == opponent => adjacent_opponent += 1,
                Some(_) => adjacent_friend += 1,
                None => {}
            }
        }
        score += 0.35 * f64::from(adjacent_opponent) + 0.15 * f64::from(adjacent_friend);

        let next = state
            .try_play(mv)
            .expect("ranked moves come from the legal set");
        let capture_gain =
            next.captures_for(state.active_color) - state.captures_for(state.active_color);
        score + 1.5 * f64::from(capture_gain)
    }

    fn liberty_score(&self, state: &GoState, ai_color: Color) -> f64 {
        let mut liberties_ai = 0i64;
        let mut liberties_opp = 0i64;
        let mut atari_ai = 0i64;
        let mut atari_opp = 0i64;
        for group in state.board.groups() {
            if group.color == ai_color {
                liberties_ai += i64::from(group.liberties);
                atari_ai += i64::from(group.liberties == 1);
            } else {
                liberties_opp += i64::from(group.liberties);
                atari_opp += i64::from(group.liberties == 1);
            }
        }
        0.04 * (liberties_ai - liberties_opp) as f64 + 0.4 * (atari_opp - atari_ai) as f64
    }
}

impl AdversarialGame for GoAi {
    type State = GoState;
    type Move = GoMove;

    fn legal_moves(&self, state: &GoState) -> Vec<GoMove> {
        state.legal_moves()
    }

    fn apply(&self, state: &GoState, mv: &GoMove) -> GoState {
        state
            .try_play(mv)
            .expect("search only applies moves from the legal set")
    }

    fn status(&self, state: &GoState) -> crate::core::TerminalStatus {
        state.status()
    }

    fn active_color(&self, state: &GoState) -> Color {
        state.active_color
    }

    fn evaluate(&self, state: &GoState, ai_color: Color) -> f64 {
        let (black_area, white_area) = state.board.area_score();
        let mut area_diff = f64::from(black_area) - f64::from(white_area);
        let mut capture_diff = f64::from(state.captures_black) - f64::from(state.captures_white);
        if ai_color == Color::White {
            area_diff = -area_diff;
            capture_diff = -capture_diff;
        }
        area_diff + 0.2 * capture_diff + self.liberty_score(state, ai_color)
    }

    fn ordered_moves(&self, state: &GoState, moves: Vec<GoMove>) -> Vec<GoMove> {
        let mut scored: Vec<(f64, GoMove)> = moves
            .into_iter()
            .map(|mv| (self.quick_score(state, &mv), mv))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(CANDIDATE_LIMIT);
        scored.into_iter().map(|(_, mv)| mv).collect()
    }
}

impl MoveSelector for GoAi {
    type State = GoState;
    type Move = GoMove;

    fn name(&self) -> &'static str {
        "Go AI"
    }

    fn choose_move(
        &self,
        state: &GoState,
        legal_moves: &[GoMove],
        config: &AiConfig,
    ) -> Result<GoMove, AiError> {
        if legal_moves.is_empty() {
            return Err(AiError::NoLegalMoves);
        }
        let ai_color = state.active_color;
        let depth = config.difficulty.max_depth.saturating_sub(1);
        let mut ctx = SearchContext::new(&config.difficulty);
        let mut rng = selection_rng(config);

        let candidates = self.ordered_moves(state, legal_moves.to_vec());
        pick_move(&candidates, SCORE_JITTER, &mut rng, |mv| {
            let next = self.apply(state, mv);
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
