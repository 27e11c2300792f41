//! Backgammon rules engine.
//!
//! Points are indexed 0-23. White travels from high indices toward 0 and
//! bears off past it; Black travels the other way. Positive point counts
//! are White checkers, negative are Black. Moves are full dice sequences;
//! the engine owns the dice roller so games are replayable from a seed.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Color, GameEngine, GameRng, RulesError, TerminalStatus};
use crate::core::grid::render_grid;

pub const TOTAL_CHECKERS: u8 = 15;
pub const POINTS: usize = 24;

/// Where a step starts or ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Holding area for hit checkers; only ever a start.
    Bar,
    /// Board point, 0-based index.
    Point(u8),
    /// Borne off; only ever an end.
    Off,
}

impl Location {
    fn label(self) -> String {
        match self {
            Location::Bar => "bar".to_string(),
            Location::Off => "off".to_string(),
            Location::Point(index) => (index + 1).to_string(),
        }
    }
}

/// One checker movement consuming one die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub from: Location,
    pub to: Location,
    pub die: u8,
    /// Whether the step lands on an opposing blot and sends it to the bar.
    pub hit: bool,
}

impl Step {
    /// Display notation with 1-based points: `24/23`, `bar/24`, `6/off`.
    #[must_use]
    pub fn notation(&self) -> String {
        format!("{}/{}", self.from.label(), self.to.label())
    }
}

/// A complete turn: every step the dice allowed, or none.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackgammonMove {
    pub steps: SmallVec<[Step; 4]>,
}

impl BackgammonMove {
    #[must_use]
    pub fn new(steps: impl Into<SmallVec<[Step; 4]>>) -> Self {
        Self {
            steps: steps.into(),
        }
    }

    /// Space-separated step notation, or `pass` for an empty turn.
    #[must_use]
    pub fn notation(&self) -> String {
        if self.steps.is_empty() {
            return "pass".to_string();
        }
        self.steps
            .iter()
            .map(Step::notation)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Immutable backgammon position, dice included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgammonState {
    /// Signed checker counts per point: positive White, negative Black.
    pub points: Vector<i8>,
    pub active_color: Color,
    pub bar_white: u8,
    pub bar_black: u8,
    pub off_white: u8,
    pub off_black: u8,
    pub dice: (u8, u8),
}

impl BackgammonState {
    /// Standard starting distribution with the given opening roll.
    #[must_use]
    pub fn initial(dice: (u8, u8)) -> Self {
        let mut points = vec![0i8; POINTS];
        points[23] = 2;
        points[12] = 5;
        points[7] = 3;
        points[5] = 5;
        points[0] = -2;
        points[11] = -5;
        points[16] = -3;
        points[18] = -5;
        Self {
            points: points.into_iter().collect(),
            active_color: Color::White,
            bar_white: 0,
            bar_black: 0,
            off_white: 0,
            off_black: 0,
            dice,
        }
    }

    /// Checkers on the bar for a color.
    #[must_use]
    pub fn bar_count(&self, color: Color) -> u8 {
        match color {
            Color::White => self.bar_white,
            Color::Black => self.bar_black,
        }
    }

    /// Checkers borne off for a color.
    #[must_use]
    pub fn off_count(&self, color: Color) -> u8 {
        match color {
            Color::White => self.off_white,
            Color::Black => self.off_black,
        }
    }

    /// Total pip distance left for a color, bar checkers counting 25.
    #[must_use]
    pub fn pip_count(&self, color: Color) -> u32 {
        let mut pips = u32::from(self.bar_count(color)) * 25;
        for (index, &count) in self.points.iter().enumerate() {
            match color {
                Color::White if count > 0 => {
                    pips += (index as u32 + 1) * count as u32;
                }
                Color::Black if count < 0 => {
                    pips += (24 - index as u32) * (-count) as u32;
                }
                _ => {}
            }
        }
        pips
    }

    /// All maximal dice sequences for the current roll.
    ///
    /// Both orderings of a non-double roll are explored, duplicates are
    /// collapsed, and only sequences playing the most steps survive. A
    /// non-double roll where only one step is playable must use the higher
    /// die when that is possible. An empty result means the turn is passed.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<BackgammonMove> {
        let dice = expanded_dice(self.dice);

        let mut sequences = Vec::new();
        self.collect_sequences(&dice, 0, &mut SmallVec::new(), &mut sequences);
        if dice.len() == 2 && dice[0] != dice[1] {
            let reversed = [dice[1], dice[0]];
            self.collect_sequences(&reversed, 0, &mut SmallVec::new(), &mut sequences);
        }

        let mut seen = FxHashSet::default();
        let mut unique: Vec<BackgammonMove> =
            sequences.into_iter().filter(|mv| seen.insert(mv.clone())).collect();

        let max_steps = unique.iter().map(|mv| mv.steps.len()).max().unwrap_or(0);
        if max_steps == 0 {
            return Vec::new();
        }
        unique.retain(|mv| mv.steps.len() == max_steps);

        if dice.len() == 2 && dice[0] != dice[1] && max_steps == 1 {
            let high = dice[0].max(dice[1]);
            let high_moves: Vec<BackgammonMove> = unique
                .iter()
                .filter(|mv| mv.steps[0].die == high)
                .cloned()
                .collect();
            if !high_moves.is_empty() {
                unique = high_moves;
            }
        }

        unique.sort_by_key(BackgammonMove::notation);
        unique
    }

    /// Apply every step of a move; the turn does not advance and the dice
    /// stay in place. Callers pair this with [`advance_with_dice`] or the
    /// engine's rolling `apply_move`.
    ///
    /// [`advance_with_dice`]: BackgammonState::advance_with_dice
    #[must_use]
    pub fn apply_steps(&self, mv: &BackgammonMove) -> BackgammonState {
        let mut state = self.clone();
        for step in &mv.steps {
            state = state.apply_step(step);
        }
        state
    }

    /// Hand the turn to the opponent with an explicit roll.
    #[must_use]
    pub fn advance_with_dice(&self, dice: (u8, u8)) -> BackgammonState {
        BackgammonState {
            active_color: self.active_color.opponent(),
            dice,
            ..self.clone()
        }
    }

    /// Whether either side has borne off every checker.
    #[must_use]
    pub fn status(&self) -> TerminalStatus {
        if self.off_white >= TOTAL_CHECKERS {
            return TerminalStatus::won(Color::White, "borne off all checkers");
        }
        if self.off_black >= TOTAL_CHECKERS {
            return TerminalStatus::won(Color::Black, "borne off all checkers");
        }
        TerminalStatus::ongoing()
    }

    /// Text dump: turn, dice, bar and off tallies, and the two board halves.
    #[must_use]
    pub fn render(&self) -> String {
        let doubles = if self.dice.0 == self.dice.1 {
            " (doubles)"
        } else {
            ""
        };
        let mut lines = vec![
            format!("Turn: {}", self.active_color),
            format!("Dice: {}, {}{}", self.dice.0, self.dice.1, doubles),
            format!("Bar: White {} | Black {}", self.bar_white, self.bar_black),
            format!("Off: White {} | Black {}", self.off_white, self.off_black),
            String::new(),
            self.render_board(),
        ];
        if self.bar_count(self.active_color) > 0 {
            lines.push(format!("{} must enter from the bar.", self.active_color));
        }
        lines.join("\n")
    }

    fn render_board(&self) -> String {
        let format_point = |count: i8| {
            if count == 0 {
                ".".to_string()
            } else if count > 0 {
                format!("W{count}")
            } else {
                format!("B{}", -count)
            }
        };
        let half = |points: Vec<usize>, label: &str| {
            let cells: Vec<String> = points
                .iter()
                .map(|&point| format_point(self.points[point - 1]))
                .collect();
            let col_labels: Vec<String> = points.iter().map(usize::to_string).collect();
            render_grid(&[cells], &[label.to_string()], &col_labels, 3, 1)
        };
        let top = half((13..=24).collect(), "Top");
        let bottom = half((1..=12).rev().collect(), "Bottom");
        format!("{top}\n{bottom}")
    }

    fn collect_sequences(
        &self,
        dice: &[u8],
        die_index: usize,
        steps: &mut SmallVec<[Step; 4]>,
        out: &mut Vec<BackgammonMove>,
    ) {
        if die_index >= dice.len() {
            out.push(BackgammonMove::new(steps.clone()));
            return;
        }
        let options = self.single_die_steps(dice[die_index]);
        if options.is_empty() {
            out.push(BackgammonMove::new(steps.clone()));
            return;
        }
        for step in options {
            let next = self.apply_step(&step);
            steps.push(step);
            next.collect_sequences(dice, die_index + 1, steps, out);
            steps.pop();
        }
    }

    fn single_die_steps(&self, die: u8) -> SmallVec<[Step; 8]> {
        let color = self.active_color;
        let sign: i8 = if color == Color::White { 1 } else { -1 };
        let mut steps = SmallVec::new();

        if self.bar_count(color) > 0 {
            // Checkers on the bar must enter before anything else moves.
            let dest = match color {
                Color::White => 24 - die as usize,
                Color::Black => die as usize - 1,
            };
            if self.is_blocked(color, dest) {
                return steps;
            }
            steps.push(Step {
                from: Location::Bar,
                to: Location::Point(dest as u8),
                die,
                hit: self.points[dest] == -sign,
            });
            return steps;
        }

        for index in 0..POINTS {
            if self.points[index] * sign <= 0 {
                continue;
            }
            let dest = if color == Color::White {
                index as i32 - i32::from(die)
            } else {
                index as i32 + i32::from(die)
            };
            if (0..POINTS as i32).contains(&dest) {
                let dest = dest as usize;
                if self.is_blocked(color, dest) {
                    continue;
                }
                steps.push(Step {
                    from: Location::Point(index as u8),
                    to: Location::Point(dest as u8),
                    die,
                    hit: self.points[dest] == -sign,
                });
            } else if self.can_bear_off(color) && self.can_bear_off_from(index, dest) {
                steps.push(Step {
                    from: Location::Point(index as u8),
                    to: Location::Off,
                    die,
                    hit: false,
                });
            }
        }
        steps
    }

    fn apply_step(&self, step: &Step) -> BackgammonState {
        let mut state = self.clone();
        let color = state.active_color;
        let sign: i8 = if color == Color::White { 1 } else { -1 };

        match step.from {
            Location::Bar => match color {
                Color::White => state.bar_white -= 1,
                Color::Black => state.bar_black -= 1,
            },
            Location::Point(index) => {
                let index = index as usize;
                state.points[index] -= sign;
            }
            Location::Off => unreachable!("steps never start off the board"),
        }

        match step.to {
            Location::Off => match color {
                Color::White => state.off_white += 1,
                Color::Black => state.off_black += 1,
            },
            Location::Point(index) => {
                let index = index as usize;
                if state.points[index] == -sign {
                    state.points[index] = 0;
                    match color {
                        Color::White => state.bar_black += 1,
                        Color::Black => state.bar_white += 1,
                    }
                }
                state.points[index] += sign;
            }
            Location::Bar => unreachable!("steps never end on the bar"),
        }

        state
    }

    fn is_blocked(&self, color: Color, dest: usize) -> bool {
        let sign: i8 = if color == Color::White { 1 } else { -1 };
        self.points[dest] * sign <= -2
    }

    /// Bearing off requires the bar empty and every checker in the home
    /// quadrant.
    fn can_bear_off(&self, color: Color) -> bool {
        match color {
            Color::White => {
                self.bar_white == 0 && self.points.iter().skip(6).all(|&count| count <= 0)
            }
            Color::Black => {
                self.bar_black == 0 && self.points.iter().take(18).all(|&count| count >= 0)
            }
        }
    }

    /// An over-shooting die bears off only when no checker sits on a higher
    /// point than `index`.
    fn can_bear_off_from(&self, index: usize, dest: i32) -> bool {
        match self.active_color {
            Color::White => {
                if dest == -1 {
                    return true;
                }
                if dest < -1 {
                    return (index + 1..6).all(|pos| self.points[pos] <= 0);
                }
                false
            }
            Color::Black => {
                if dest == 24 {
                    return true;
                }
                if dest > 24 {
                    return (18..index).all(|pos| self.points[pos] >= 0);
                }
                false
            }
        }
    }
}

fn expanded_dice(dice: (u8, u8)) -> SmallVec<[u8; 4]> {
    if dice.0 == dice.1 {
        SmallVec::from_slice(&[dice.0; 4])
    } else {
        SmallVec::from_slice(&[dice.0, dice.1])
    }
}

/// Backgammon engine; owns the dice roller.
#[derive(Clone, Debug)]
pub struct BackgammonEngine {
    rng: GameRng,
}

impl BackgammonEngine {
    /// Engine with OS-entropy dice.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: GameRng::from_entropy(),
        }
    }

    /// Engine with a seeded roller; whole games replay identically.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }

    /// Forfeit the turn when no sequence is playable; rolls for the
    /// opponent.
    pub fn pass_turn(&mut self, state: &BackgammonState) -> BackgammonState {
        state.advance_with_dice(self.rng.roll_dice())
    }
}

impl Default for BackgammonEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine for BackgammonEngine {
    type State = BackgammonState;
    type Move = BackgammonMove;

    fn name(&self) -> &'static str {
        "Backgammon"
    }

    fn new_game(&mut self) -> BackgammonState {
        BackgammonState::initial(self.rng.roll_dice())
    }

    fn legal_moves(&self, state: &BackgammonState) -> Vec<BackgammonMove> {
        state.legal_moves()
    }

    fn apply_move(
        &mut self,
        state: &BackgammonState,
        mv: &BackgammonMove,
    ) -> Result<BackgammonState, RulesError> {
        if !state.legal_moves().contains(mv) {
            return Err(RulesError::IllegalMove);
        }
        Ok(state.apply_steps(mv).advance_with_dice(self.rng.roll_dice()))
    }

    fn is_terminal(&self, state: &BackgammonState) -> TerminalStatus {
        state.status()
    }

    fn render(&self, state: &BackgammonState) -> String {
        state.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_state(dice: (u8, u8)) -> BackgammonState {
        BackgammonState {
            points: std::iter::repeat(0i8).take(POINTS).collect(),
            active_color: Color::White,
            bar_white: 0,
            bar_black: 0,
            off_white: 0,
            off_black: 0,
            dice,
        }
    }

    #[test]
    fn test_initial_checker_totals() {
        let state = BackgammonState::initial((3, 1));
        let white: i8 = state.points.iter().filter(|&&c| c > 0).sum();
        let black: i8 = state.points.iter().map(|&c| c.min(0)).sum();
        assert_eq!(white, 15);
        assert_eq!(black, -15);
        assert_eq!(state.active_color, Color::White);
        assert_eq!(state.pip_count(Color::White), 167);
        assert_eq!(state.pip_count(Color::Black), 167);
    }

    #[test]
    fn test_opening_moves_use_both_dice() {
        let state = BackgammonState::initial((3, 1));
        let moves = state.legal_moves();
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.steps.len() == 2));
    }

    #[test]
    fn test_doubles_expand_to_four_steps() {
        let state = BackgammonState::initial((2, 2));
        let moves = state.legal_moves();
        assert!(moves.iter().all(|mv| mv.steps.len() == 4));
    }

    #[test]
    fn test_bar_entry_is_forced() {
        let mut state = BackgammonState::initial((2, 3));
        state.bar_white = 1;
        state.points[23] = 1;
        let moves = state.legal_moves();
        assert!(moves
            .iter()
            .all(|mv| mv.steps[0].from == Location::Bar));
        // Entry with a 2 lands on point index 22 (point 23).
        assert!(moves
            .iter()
            .any(|mv| mv.steps[0].to == Location::Point(22)));
    }

    #[test]
    fn test_blocked_entry_passes_turn() {
        let mut state = bare_state((2, 2));
        state.bar_white = 1;
        state.points[22] = -2; // Black anchors the only entry point for a 2.
        state.points[0] = 14;
        state.points[10] = -13;
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_hit_sends_blot_to_bar() {
        let mut state = bare_state((1, 6));
        state.points[6] = 1; // White checker on point 7
        state.points[5] = -1; // Black blot on point 6
        let moves = state.legal_moves();
        let hitting = moves
            .iter()
            .flat_map(|mv| mv.steps.iter())
            .find(|step| step.hit)
            .expect("a hitting step should exist");
        assert_eq!(hitting.to, Location::Point(5));

        let after = state.apply_steps(&BackgammonMove::new(vec![*hitting]));
        assert_eq!(after.bar_black, 1);
        assert_eq!(after.points[5], 1);
    }

    #[test]
    fn test_higher_die_preferred_for_single_step() {
        // Last White checker on point 1 with dice (1, 6): either die bears
        // it off on its own, so two one-step sequences exist and the rule
        // must keep only the one playing the 6.
        let mut state = bare_state((1, 6));
        state.points[0] = 1;
        state.off_white = 14;

        // Both dice are individually playable.
        assert_eq!(state.single_die_steps(1).len(), 1);
        assert_eq!(state.single_die_steps(6).len(), 1);

        let moves = state.legal_moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].steps.len(), 1);
        assert_eq!(moves[0].steps[0].die, 6);
        assert_eq!(moves[0].steps[0].to, Location::Off);
    }

    #[test]
    fn test_bear_off_requires_all_home() {
        let mut state = bare_state((6, 5));
        state.points[5] = 14;
        state.points[7] = 1; // one checker still outside home
        let moves = state.legal_moves();
        assert!(moves
            .iter()
            .flat_map(|mv| mv.steps.iter())
            .all(|step| step.to != Location::Off));
    }

    #[test]
    fn test_overshoot_needs_no_higher_checker() {
        let mut state = bare_state((6, 6));
        state.points[3] = 1; // point 4, die 6 overshoots
        state.points[4] = 1; // higher checker on point 5
        state.off_white = 13;
        let steps = state.single_die_steps(6);
        // Only the checker on point 5 may bear off with the 6.
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].from, Location::Point(4));
        assert_eq!(steps[0].to, Location::Off);
    }

    #[test]
    fn test_win_detection() {
        let mut state = bare_state((1, 2));
        state.off_white = 15;
        state.points[0] = -15;
        let status = state.status();
        assert!(status.is_terminal);
        assert_eq!(status.winner(), Some(Color::White));
    }

    #[test]
    fn test_seeded_engine_replays_identically() {
        let mut engine_a = BackgammonEngine::with_seed(11);
        let mut engine_b = BackgammonEngine::with_seed(11);
        let state_a = engine_a.new_game();
        let state_b = engine_b.new_game();
        assert_eq!(state_a, state_b);

        let moves = state_a.legal_moves();
        let next_a = engine_a.apply_move(&state_a, &moves[0]).unwrap();
        let next_b = engine_b.apply_move(&state_b, &moves[0]).unwrap();
        assert_eq!(next_a, next_b);
    }

    #[test]
    fn test_render_shows_dice_and_bar() {
        let state = BackgammonState::initial((4, 4));
        let text = state.render();
        assert!(text.contains("Dice: 4, 4 (doubles)"));
        assert!(text.contains("Bar: White 0 | Black 0"));
        assert!(text.contains("W2"));
        assert!(text.contains("B5"));
    }

    #[test]
    fn test_move_notation() {
        let mv = BackgammonMove::new(vec![
            Step {
                from: Location::Bar,
                to: Location::Point(23),
                die: 1,
                hit: false,
            },
            Step {
                from: Location::Point(5),
                to: Location::Off,
                die: 6,
                hit: false,
            },
        ]);
        assert_eq!(mv.notation(), "bar/24 6/off");
        assert_eq!(BackgammonMove::new(Vec::<Step>::new()).notation(), "pass");
    }
}
