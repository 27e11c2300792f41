//! Checkers (English draughts) rules engine.
//!
//! Captures are mandatory and multi-jump sequences must be taken to
//! completion, except that a man promoting mid-jump stops on the king row.
//! Black moves first.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::{Color, GameEngine, RulesError, Square, TerminalStatus};
use crate::core::grid::{alphabetic_labels, render_grid};

const KING_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Man or king.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckerKind {
    Man,
    King,
}

/// A colored checker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checker {
    pub color: Color,
    pub kind: CheckerKind,
}

impl Checker {
    #[must_use]
    pub const fn new(color: Color, kind: CheckerKind) -> Self {
        Self { color, kind }
    }

    /// Board symbol: `w`/`b` for men, `W`/`B` for kings.
    #[must_use]
    pub fn symbol(self) -> char {
        match (self.color, self.kind) {
            (Color::White, CheckerKind::Man) => 'w',
            (Color::White, CheckerKind::King) => 'W',
            (Color::Black, CheckerKind::Man) => 'b',
            (Color::Black, CheckerKind::King) => 'B',
        }
    }

    fn move_directions(self) -> SmallVec<[(i8, i8); 4]> {
        match self.kind {
            CheckerKind::King => SmallVec::from_slice(&KING_DIRECTIONS),
            CheckerKind::Man => {
                let dr = if self.color == Color::White { -1 } else { 1 };
                smallvec![(dr, -1), (dr, 1)]
            }
        }
    }
}

/// 8x8 board; only dark squares are ever occupied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vector<Option<Checker>>,
}

impl Board {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            cells: std::iter::repeat(None).take(64).collect(),
        }
    }

    /// Twelve men per side on the dark squares of the first three rows.
    #[must_use]
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for square in Square::all().filter(|sq| is_dark_square(*sq)) {
            let checker = match square.row() {
                0..=2 => Some(Checker::new(Color::Black, CheckerKind::Man)),
                5..=7 => Some(Checker::new(Color::White, CheckerKind::Man)),
                _ => None,
            };
            board = board.with(square, checker);
        }
        board
    }

    #[must_use]
    pub fn get(&self, square: Square) -> Option<Checker> {
        self.cells[square.index()]
    }

    #[must_use]
    pub fn with(&self, square: Square, checker: Option<Checker>) -> Self {
        Self {
            cells: self.cells.update(square.index(), checker),
        }
    }

    fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Checker)> + '_ {
        Square::all().filter_map(move |square| {
            self.get(square)
                .filter(|checker| checker.color == color)
                .map(|checker| (square, checker))
        })
    }
}

/// A simple move or jump sequence.
///
/// `path` holds every square visited, start first; `captures` holds the
/// jumped squares in order. A plain move has an empty capture list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckersMove {
    pub path: SmallVec<[Square; 4]>,
    pub captures: SmallVec<[Square; 4]>,
}

impl CheckersMove {
    /// Simple diagonal step.
    #[must_use]
    pub fn step(from: Square, to: Square) -> Self {
        Self {
            path: smallvec![from, to],
            captures: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Display notation: `b6-a5` for steps, `b6xd4xf2` for jumps.
    #[must_use]
    pub fn notation(&self) -> String {
        let separator = if self.is_capture() { "x" } else { "-" };
        self.path
            .iter()
            .map(|square| square.to_algebraic())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Immutable checkers position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckersState {
    pub board: Board,
    pub active_color: Color,
}

impl CheckersState {
    /// Starting position, Black to move.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),
            active_color: Color::Black,
        }
    }

    /// All legal moves. When any capture exists, only captures are legal.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<CheckersMove> {
        let mut captures = Vec::new();
        for (square, checker) in self.board.pieces(self.active_color) {
            capture_sequences(
                &self.board,
                square,
                checker,
                smallvec![square],
                SmallVec::new(),
                &mut captures,
            );
        }
        if !captures.is_empty() {
            return captures;
        }

        let mut steps = Vec::new();
        for (square, checker) in self.board.pieces(self.active_color) {
            for (dr, dc) in checker.move_directions() {
                if let Some(target) = square.offset(dr, dc) {
                    if self.board.get(target).is_none() {
                        steps.push(CheckersMove::step(square, target));
                    }
                }
            }
        }
        steps
    }

    /// Apply a move without validating membership in the legal set.
    #[must_use]
    pub fn apply(&self, mv: &CheckersMove) -> CheckersState {
        let start = mv.path[0];
        let end = mv.path[mv.path.len() - 1];
        let mut checker = self
            .board
            .get(start)
            .expect("move must start on an occupied square");

        let mut board = self.board.with(start, None);
        for &jumped in &mv.captures {
            board = board.with(jumped, None);
        }
        if checker.kind == CheckerKind::Man && is_king_row(checker.color, end.row()) {
            checker = Checker::new(checker.color, CheckerKind::King);
        }
        board = board.with(end, Some(checker));

        CheckersState {
            board,
            active_color: self.active_color.opponent(),
        }
    }

    /// A side with no legal moves loses, whether it is blocked or wiped out.
    #[must_use]
    pub fn status(&self) -> TerminalStatus {
        if self.legal_moves().is_empty() {
            TerminalStatus::won(self.active_color.opponent(), "no moves")
        } else {
            TerminalStatus::ongoing()
        }
    }

    /// Board dump with a capture notice when jumps are mandatory.
    #[must_use]
    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = (0..8u8)
            .map(|row| {
                (0..8u8)
                    .map(|col| {
                        let square = Square::new(row, col);
                        match self.board.get(square) {
                            Some(checker) => checker.symbol().to_string(),
                            None if is_dark_square(square) => ".".to_string(),
                            None => " ".to_string(),
                        }
                    })
                    .collect()
            })
            .collect();
        let row_labels: Vec<String> = (1..=8).rev().map(|rank| rank.to_string()).collect();
        let board = render_grid(&cells, &row_labels, &alphabetic_labels(8, true), 1, 1);

        let mut lines = vec![format!("Turn: {}", self.active_color), board];
        if self.legal_moves().iter().any(CheckersMove::is_capture) {
            lines.push("Captures available.".to_string());
        }
        lines.join("\n")
    }
}

/// Recursively extend a jump chain; records the move at every dead end.
/// A man reaching the king row stops jumping immediately.
fn capture_sequences(
    board: &Board,
    from: Square,
    checker: Checker,
    path: SmallVec<[Square; 4]>,
    captured: SmallVec<[Square; 4]>,
    out: &mut Vec<CheckersMove>,
) {
    let mut found_jump = false;

    for (dr, dc) in checker.move_directions() {
        let Some(jumped) = from.offset(dr, dc) else {
            continue;
        };
        let Some(dest) = from.offset(2 * dr, 2 * dc) else {
            continue;
        };
        let over = board.get(jumped);
        if over.map_or(true, |piece| piece.color == checker.color) {
            continue;
        }
        if board.get(dest).is_some() {
            continue;
        }

        found_jump = true;
        let next_board = board.with(from, None).with(jumped, None).with(dest, Some(checker));

        let mut next_path = path.clone();
        next_path.push(dest);
        let mut next_captured = captured.clone();
        next_captured.push(jumped);

        if checker.kind == CheckerKind::Man && is_king_row(checker.color, dest.row()) {
            out.push(CheckersMove {
                path: next_path,
                captures: next_captured,
            });
            continue;
        }
        capture_sequences(&next_board, dest, checker, next_path, next_captured, out);
    }

    if !found_jump && !captured.is_empty() {
        out.push(CheckersMove { path, captures: captured });
    }
}

fn is_dark_square(square: Square) -> bool {
    (square.row() + square.col()) % 2 == 1
}

fn is_king_row(color: Color, row: u8) -> bool {
    match color {
        Color::White => row == 0,
        Color::Black => row == 7,
    }
}

/// Stateless checkers engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckersEngine;

impl CheckersEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GameEngine for CheckersEngine {
    type State = CheckersState;
    type Move = CheckersMove;

    fn name(&self) -> &'static str {
        "Checkers"
    }

    fn new_game(&mut self) -> CheckersState {
        CheckersState::initial()
    }

    fn legal_moves(&self, state: &CheckersState) -> Vec<CheckersMove> {
        state.legal_moves()
    }

    fn apply_move(
        &mut self,
        state: &CheckersState,
        mv: &CheckersMove,
    ) -> Result<CheckersState, RulesError> {
        if !state.legal_moves().contains(mv) {
            return Err(RulesError::IllegalMove);
        }
        Ok(state.apply(mv))
    }

    fn is_terminal(&self, state: &CheckersState) -> TerminalStatus {
        state.status()
    }

    fn render(&self, state: &CheckersState) -> String {
        state.render()
    }
}
