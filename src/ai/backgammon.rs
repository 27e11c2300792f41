//! Backgammon move selection: two-ply expectiminimax.
//!
//! Ply one applies the candidate sequence; ply two averages the opponent's
//! best reply over all 36 dice outcomes. The race evaluation weighs pips,
//! borne-off checkers, and checkers on the bar.

use crate::core::{AiError, Color};
use crate::games::backgammon::{BackgammonMove, BackgammonState};

use super::difficulty::AiConfig;
use super::search::{pick_move, terminal_score, SearchContext};
use super::{selection_rng, MoveSelector};

const SCORE_JITTER: f64 = 0.4;
const DICE_PROBABILITY: f64 = 1.0 / 36.0;

fn dice_outcomes() -> impl Iterator<Item = (u8, u8)> {
    (1..=6).flat_map(|d1| (1..=6).map(move |d2| (d1, d2)))
}

/// Expectiminimax backgammon selector.
#[derive(Clone, Copy, Debug, Default)]
pub struct BackgammonAi;

impl BackgammonAi {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn score_move(
        &self,
        state: &BackgammonState,
        mv: &BackgammonMove,
        ai_color: Color,
        depth: u32,
        ctx: &mut SearchContext,
    ) -> f64 {
        ctx.visit();
        // Placeholder dice; the chance layer substitutes every real roll.
        let next = state.apply_steps(mv).advance_with_dice((1, 1));
        if ctx.out_of_budget() {
            return self.evaluate(&next, ai_color);
        }

        let status = next.status();
        if status.is_terminal {
            return terminal_score(&status, ai_color);
        }
        if depth <= 1 {
            return self.evaluate(&next, ai_color);
        }
        self.expected_opponent(&next, ai_color, ctx)
    }

    /// Probability-weighted value of the opponent's best reply across all
    /// dice outcomes. The opponent minimizes the evaluation.
    fn expected_opponent(
        &self,
        state: &BackgammonState,
        ai_color: Color,
        ctx: &mut SearchContext,
    ) -> f64 {
        let mut total = 0.0;
        for dice in dice_outcomes() {
            if ctx.out_of_budget() {
                break;
            }
            let opponent_state = BackgammonState {
                dice,
                ..state.clone()
            };
            let replies = opponent_state.legal_moves();
            if replies.is_empty() {
                total += DICE_PROBABILITY * self.evaluate(&opponent_state, ai_color);
                continue;
            }

            let mut best_reply = f64::INFINITY;
            for reply in &replies {
                if ctx.out_of_budget() {
                    break;
                }
                ctx.visit();
                let reply_state = opponent_state.apply_steps(reply).advance_with_dice((1, 1));
                best_reply = best_reply.min(self.evaluate(&reply_state, ai_color));
            }
            total += DICE_PROBABILITY * best_reply;
        }
        total
    }

    /// Race heuristic from `ai_color`'s perspective.
    fn evaluate(&self, state: &BackgammonState, ai_color: Color) -> f64 {
        let opponent = ai_color.opponent();
        let pip_score = f64::from(state.pip_count(opponent)) - f64::from(state.pip_count(ai_color));
        let off_score =
            f64::from(state.off_count(ai_color)) - f64::from(state.off_count(opponent));
        let bar_score =
            f64::from(state.bar_count(opponent)) - f64::from(state.bar_count(ai_color));
        pip_score * 0.1 + off_score * 5.0 + bar_score * 2.0
    }
}

impl MoveSelector for BackgammonAi {
    type State = BackgammonState;
    type Move = BackgammonMove;

    fn name(&self) -> &'static str {
        "Backgammon AI"
    }

    fn choose_move(
        &self,
        state: &BackgammonState,
        legal_moves: &[BackgammonMove],
        config: &AiConfig,
    ) -> Result<BackgammonMove, AiError> {
        let ai_color = state.active_color;
        // The chance layer caps useful lookahead at two plies.
        let depth = config.difficulty.max_depth.clamp(1, 2);
        let mut ctx = SearchContext::new(&config.difficulty);
        let mut rng = selection_rng(config);

        pick_move(legal_moves, SCORE_JITTER, &mut rng, |mv| {
            self.score_move(state, mv, ai_color, depth, &mut ctx)
        })
    }
}
