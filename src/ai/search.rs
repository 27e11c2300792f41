//! Shared search machinery: budget tracking, generic alpha-beta, and the
//! jittered root-move selection every selector uses.

use std::time::Instant;

use crate::core::{AiError, Color, GameRng, TerminalStatus};

use super::difficulty::AiDifficulty;

/// Score for a decided game, from the searching side's perspective.
pub const WIN_SCORE: f64 = 10_000.0;

/// Tracks node and wall-clock budgets across one move selection.
#[derive(Debug)]
pub struct SearchContext {
    max_nodes: Option<u64>,
    time_limit: Option<std::time::Duration>,
    start: Instant,
    nodes: u64,
}

impl SearchContext {
    #[must_use]
    pub fn new(difficulty: &AiDifficulty) -> Self {
        Self {
            max_nodes: difficulty.max_nodes,
            time_limit: difficulty.time_limit,
            start: Instant::now(),
            nodes: 0,
        }
    }

    /// Count a visited node.
    pub fn visit(&mut self) {
        self.nodes += 1;
    }

    /// Nodes visited so far.
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Whether either budget is exhausted.
    #[must_use]
    pub fn out_of_budget(&self) -> bool {
        if let Some(max_nodes) = self.max_nodes {
            if self.nodes >= max_nodes {
                return true;
            }
        }
        match self.time_limit {
            Some(limit) => self.start.elapsed() >= limit,
            None => false,
        }
    }
}

/// Two-player zero-sum game as the alpha-beta search sees it.
///
/// `ordered_moves` is a hook for move ordering and candidate pruning; the
/// default keeps the engine's order.
pub trait AdversarialGame {
    type State;
    type Move: Clone;

    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move>;
    fn apply(&self, state: &Self::State, mv: &Self::Move) -> Self::State;
    fn status(&self, state: &Self::State) -> TerminalStatus;
    fn active_color(&self, state: &Self::State) -> Color;
    /// Heuristic score from `ai_color`'s perspective.
    fn evaluate(&self, state: &Self::State, ai_color: Color) -> f64;

    fn ordered_moves(&self, _state: &Self::State, moves: Vec<Self::Move>) -> Vec<Self::Move> {
        moves
    }
}

/// Score for a terminal state from `ai_color`'s perspective.
#[must_use]
pub fn terminal_score(status: &TerminalStatus, ai_color: Color) -> f64 {
    match status.winner() {
        None => 0.0,
        Some(winner) if winner == ai_color => WIN_SCORE,
        Some(_) => -WIN_SCORE,
    }
}

/// Depth-limited alpha-beta over an [`AdversarialGame`].
///
/// Budget exhaustion cuts over to the heuristic evaluation, so the value
/// returned is always finite for a state with any move.
pub fn alpha_beta<G: AdversarialGame>(
    game: &G,
    state: &G::State,
    depth: u32,
    mut alpha: f64,
    mut beta: f64,
    ai_color: Color,
    ctx: &mut SearchContext,
) -> f64 {
    ctx.visit();
    if ctx.out_of_budget() {
        return game.evaluate(state, ai_color);
    }

    let status = game.status(state);
    if status.is_terminal {
        return terminal_score(&status, ai_color);
    }
    if depth == 0 {
        return game.evaluate(state, ai_color);
    }

    let moves = game.ordered_moves(state, game.legal_moves(state));
    if moves.is_empty() {
        return game.evaluate(state, ai_color);
    }

    if game.active_color(state) == ai_color {
        let mut value = f64::NEG_INFINITY;
        for mv in &moves {
            let child = game.apply(state, mv);
            value = value.max(alpha_beta(game, &child, depth - 1, alpha, beta, ai_color, ctx));
            alpha = alpha.max(value);
            if alpha >= beta || ctx.out_of_budget() {
                break;
            }
        }
        value
    } else {
        let mut value = f64::INFINITY;
        for mv in &moves {
            let child = game.apply(state, mv);
            value = value.min(alpha_beta(game, &child, depth - 1, alpha, beta, ai_color, ctx));
            beta = beta.min(value);
            if alpha >= beta || ctx.out_of_budget() {
                break;
            }
        }
        value
    }
}

/// Score each candidate, perturb by `jitter`, and pick the best; exact
/// score ties are broken uniformly at random. The RNG consumption order is
/// fixed (one jitter draw per candidate, then at most one tie-break draw),
/// so a seeded selection is reproducible.
pub(crate) fn pick_move<M: Clone>(
    candidates: &[M],
    jitter: f64,
    rng: &mut GameRng,
    mut score_fn: impl FnMut(&M) -> f64,
) -> Result<M, AiError> {
    if candidates.is_empty() {
        return Err(AiError::NoLegalMoves);
    }

    let mut best_score = f64::NEG_INFINITY;
    let mut best: Vec<&M> = Vec::new();
    for mv in candidates {
        let score = score_fn(mv) + rng.jitter(jitter);
        #[allow(clippy::float_cmp)]
        if score > best_score {
            best_score = score;
            best.clear();
            best.push(mv);
        } else if score == best_score {
            best.push(mv);
        }
    }

    if best.len() == 1 {
        return Ok(best[0].clone());
    }
    let chosen = rng.choose(&best).expect("best set is never empty");
    Ok((*chosen).clone())
}
