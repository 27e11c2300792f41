//! Go rules engine: 9x9 board, simple ko, area scoring.
//!
//! Placement removes liberty-less opponent groups first, then rejects the
//! move as suicide if the placed group still has no liberties. Simple ko
//! forbids recreating the position exactly one move back; persistent boards
//! make that a cheap structural equality check. Two consecutive passes end
//! the game and trigger area scoring.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Color, GameEngine, RulesError, TerminalStatus};
use crate::core::grid::render_grid;

pub const BOARD_SIZE: usize = 9;

/// Column letters skip `I`, per Go convention.
pub const COL_LABELS: [char; BOARD_SIZE] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J'];

/// Intersection on the 9x9 board. Row 0 is the top edge (rank 9).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Panics if either component is out of range.
    #[must_use]
    pub fn new(row: u8, col: u8) -> Self {
        assert!(
            (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE,
            "coordinate out of range: ({row}, {col})"
        );
        Self { row, col }
    }

    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// Every intersection in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE as u8)
            .flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Coord { row, col }))
    }

    /// Orthogonal neighbors, clipped at the edges.
    #[must_use]
    pub fn neighbors(self) -> SmallVec<[Coord; 4]> {
        let mut out = SmallVec::new();
        if self.row > 0 {
            out.push(Coord::new(self.row - 1, self.col));
        }
        if (self.row as usize) < BOARD_SIZE - 1 {
            out.push(Coord::new(self.row + 1, self.col));
        }
        if self.col > 0 {
            out.push(Coord::new(self.row, self.col - 1));
        }
        if (self.col as usize) < BOARD_SIZE - 1 {
            out.push(Coord::new(self.row, self.col + 1));
        }
        out
    }

    /// Display coordinate like `D4`.
    #[must_use]
    pub fn coordinate(self) -> String {
        format!(
            "{}{}",
            COL_LABELS[self.col as usize],
            BOARD_SIZE - self.row as usize
        )
    }

    /// Parse `D4`-style text; `None` for anything out of range or using the
    /// skipped letter `I`.
    #[must_use]
    pub fn from_coordinate(text: &str) -> Option<Coord> {
        let text = text.trim();
        let mut chars = text.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        let col = COL_LABELS.iter().position(|&label| label == letter)?;
        let number: usize = chars.as_str().parse().ok()?;
        if !(1..=BOARD_SIZE).contains(&number) {
            return None;
        }
        Some(Coord::new((BOARD_SIZE - number) as u8, col as u8))
    }
}

/// A stone placement or a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GoMove {
    pub point: Option<Coord>,
}

impl GoMove {
    #[must_use]
    pub const fn pass() -> Self {
        Self { point: None }
    }

    #[must_use]
    pub const fn place(coord: Coord) -> Self {
        Self { point: Some(coord) }
    }

    #[must_use]
    pub const fn is_pass(&self) -> bool {
        self.point.is_none()
    }

    #[must_use]
    pub fn notation(&self) -> String {
        match self.point {
            Some(coord) => coord.coordinate(),
            None => "pass".to_string(),
        }
    }
}

/// A connected set of same-colored stones and its liberty count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub color: Color,
    pub stones: u32,
    pub liberties: u32,
}

/// 9x9 board of optional stones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vector<Option<Color>>,
}

impl Board {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            cells: std::iter::repeat(None)
                .take(BOARD_SIZE * BOARD_SIZE)
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Color> {
        self.cells[coord.index()]
    }

    #[must_use]
    pub fn with(&self, coord: Coord, stone: Option<Color>) -> Self {
        Self {
            cells: self.cells.update(coord.index(), stone),
        }
    }

    /// Place a stone, removing captured opponent groups. Errors on an
    /// occupied point or a suicidal placement; ko is the caller's concern.
    pub fn place_stone(&self, color: Color, coord: Coord) -> Result<(Board, u32), RulesError> {
        if self.get(coord).is_some() {
            return Err(RulesError::Occupied);
        }
        let mut board = self.with(coord, Some(color));

        let mut captured: FxHashSet<Coord> = FxHashSet::default();
        for neighbor in coord.neighbors() {
            if board.get(neighbor) != Some(color.opponent()) {
                continue;
            }
            let (group, liberties) = board.collect_group(neighbor);
            if liberties.is_empty() {
                captured.extend(group);
            }
        }
        for &stone in &captured {
            board = board.with(stone, None);
        }

        let (_, liberties) = board.collect_group(coord);
        if liberties.is_empty() {
            return Err(RulesError::Suicide);
        }
        Ok((board, captured.len() as u32))
    }

    /// Every maximal group on the board.
    #[must_use]
    pub fn groups(&self) -> Vec<Group> {
        let mut visited: FxHashSet<Coord> = FxHashSet::default();
        let mut groups = Vec::new();
        for coord in Coord::all() {
            if visited.contains(&coord) {
                continue;
            }
            let Some(color) = self.get(coord) else {
                continue;
            };
            let (stones, liberties) = self.collect_group(coord);
            visited.extend(stones.iter().copied());
            groups.push(Group {
                color,
                stones: stones.len() as u32,
                liberties: liberties.len() as u32,
            });
        }
        groups
    }

    /// Area score `(black, white)`: stones plus territory. An empty region
    /// counts as territory only when all its bordering stones share a color.
    #[must_use]
    pub fn area_score(&self) -> (u32, u32) {
        let mut black = 0u32;
        let mut white = 0u32;
        for coord in Coord::all() {
            match self.get(coord) {
                Some(Color::Black) => black += 1,
                Some(Color::White) => white += 1,
                None => {}
            }
        }

        let mut visited: FxHashSet<Coord> = FxHashSet::default();
        for coord in Coord::all() {
            if self.get(coord).is_some() || visited.contains(&coord) {
                continue;
            }
            let (region, borders) = self.collect_region(coord);
            visited.extend(region.iter().copied());
            if borders.len() == 1 {
                match borders.iter().next() {
                    Some(Color::Black) => black += region.len() as u32,
                    Some(Color::White) => white += region.len() as u32,
                    None => {}
                }
            }
        }
        (black, white)
    }

    fn collect_group(&self, start: Coord) -> (FxHashSet<Coord>, FxHashSet<Coord>) {
        let mut group = FxHashSet::default();
        let mut liberties = FxHashSet::default();
        let Some(color) = self.get(start) else {
            return (group, liberties);
        };
        let mut stack = vec![start];
        while let Some(coord) = stack.pop() {
            if !group.insert(coord) {
                continue;
            }
            for neighbor in coord.neighbors() {
                match self.get(neighbor) {
                    None => {
                        liberties.insert(neighbor);
                    }
                    Some(stone) if stone == color && !group.contains(&neighbor) => {
                        stack.push(neighbor);
                    }
                    Some(_) => {}
                }
            }
        }
        (group, liberties)
    }

    fn collect_region(&self, start: Coord) -> (FxHashSet<Coord>, FxHashSet<Color>) {
        let mut region = FxHashSet::default();
        let mut borders = FxHashSet::default();
        let mut stack = vec![start];
        while let Some(coord) = stack.pop() {
            if !region.insert(coord) {
                continue;
            }
            for neighbor in coord.neighbors() {
                match self.get(neighbor) {
                    None => {
                        if !region.contains(&neighbor) {
                            stack.push(neighbor);
                        }
                    }
                    Some(color) => {
                        borders.insert(color);
                    }
                }
            }
        }
        (region, borders)
    }
}

/// Immutable go position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoState {
    pub board: Board,
    pub active_color: Color,
    /// Board before the last move, for simple-ko comparison.
    pub previous_board: Option<Board>,
    pub consecutive_passes: u8,
    pub captures_black: u32,
    pub captures_white: u32,
}

impl GoState {
    /// Empty board, Black to move.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            board: Board::empty(),
            active_color: Color::Black,
            previous_board: None,
            consecutive_passes: 0,
            captures_black: 0,
            captures_white: 0,
        }
    }

    /// Stones captured so far by a color.
    #[must_use]
    pub fn captures_for(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.captures_black,
            Color::White => self.captures_white,
        }
    }

    /// Apply a move, rejecting occupied points, suicide, and ko.
    pub fn try_play(&self, mv: &GoMove) -> Result<GoState, RulesError> {
        let Some(coord) = mv.point else {
            return Ok(GoState {
                board: self.board.clone(),
                active_color: self.active_color.opponent(),
                previous_board: Some(self.board.clone()),
                consecutive_passes: self.consecutive_passes + 1,
                captures_black: self.captures_black,
                captures_white: self.captures_white,
            });
        };

        let (board, captured) = self.board.place_stone(self.active_color, coord)?;
        if self.previous_board.as_ref() == Some(&board) {
            return Err(RulesError::KoViolation);
        }

        let mut captures_black = self.captures_black;
        let mut captures_white = self.captures_white;
        match self.active_color {
            Color::Black => captures_black += captured,
            Color::White => captures_white += captured,
        }

        Ok(GoState {
            board,
            active_color: self.active_color.opponent(),
            previous_board: Some(self.board.clone()),
            consecutive_passes: 0,
            captures_black,
            captures_white,
        })
    }

    /// Every playable point plus the pass move (always last).
    #[must_use]
    pub fn legal_moves(&self) -> Vec<GoMove> {
        let mut moves: Vec<GoMove> = Coord::all()
            .filter_map(|coord| {
                let mv = GoMove::place(coord);
                self.try_play(&mv).ok().map(|_| mv)
            })
            .collect();
        moves.push(GoMove::pass());
        moves
    }

    /// Two consecutive passes end the game; area scoring decides it.
    #[must_use]
    pub fn status(&self) -> TerminalStatus {
        if self.consecutive_passes < 2 {
            return TerminalStatus::ongoing();
        }
        let (black, white) = self.board.area_score();
        let reason = format!("area score {black}-{white}");
        if black > white {
            TerminalStatus::won(Color::Black, reason)
        } else if white > black {
            TerminalStatus::won(Color::White, reason)
        } else {
            TerminalStatus::drawn(reason)
        }
    }

    /// Board dump with capture and pass counters.
    #[must_use]
    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = (0..BOARD_SIZE as u8)
            .map(|row| {
                (0..BOARD_SIZE as u8)
                    .map(|col| match self.board.get(Coord::new(row, col)) {
                        Some(Color::Black) => "B".to_string(),
                        Some(Color::White) => "W".to_string(),
                        None => ".".to_string(),
                    })
                    .collect()
            })
            .collect();
        let row_labels: Vec<String> = (1..=BOARD_SIZE).rev().map(|rank| rank.to_string()).collect();
        let col_labels: Vec<String> = COL_LABELS.iter().map(char::to_string).collect();
        let board = render_grid(&cells, &row_labels, &col_labels, 1, 1);

        [
            format!("Turn: {}", self.active_color),
            format!(
                "Captures: Black {} | White {}",
                self.captures_black, self.captures_white
            ),
            format!("Consecutive passes: {}", self.consecutive_passes),
            board,
        ]
        .join("\n")
    }
}

/// Stateless go engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoEngine;

impl GoEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GameEngine for GoEngine {
    type State = GoState;
    type Move = GoMove;

    fn name(&self) -> &'static str {
        "Go"
    }

    fn new_game(&mut self) -> GoState {
        GoState::initial()
    }

    fn legal_moves(&self, state: &GoState) -> Vec<GoMove> {
        state.legal_moves()
    }

    fn apply_move(&mut self, state: &GoState, mv: &GoMove) -> Result<GoState, RulesError> {
        state.try_play(mv)
    }

    fn is_terminal(&self, state: &GoState) -> TerminalStatus {
        state.status()
    }

    fn render(&self, state: &GoState) -> String {
        state.render()
    }
}
