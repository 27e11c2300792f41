//! Chess rules engine.
//!
//! Full rule set: pawn double pushes, en passant, promotion to four piece
//! kinds, castling with rights tracking, check/checkmate/stalemate detection.
//! States are immutable values; every move builds a new board via structural
//! sharing, so search can clone states freely.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Color, GameEngine, RulesError, Square, TerminalStatus};
use crate::core::grid::{alphabetic_labels, render_grid};

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
];

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Chess piece kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Lowercase letter used in promotion notation (`q`, `r`, `b`, `n`).
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// A colored piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[must_use]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Board symbol: uppercase for White, lowercase for Black.
    #[must_use]
    pub fn symbol(self) -> char {
        match self.color {
            Color::White => self.kind.letter().to_ascii_uppercase(),
            Color::Black => self.kind.letter(),
        }
    }
}

/// 8x8 board of optional pieces, backed by a persistent vector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vector<Option<Piece>>,
}

impl Board {
    /// Board with no pieces.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            cells: std::iter::repeat(None).take(64).collect(),
        }
    }

    /// Standard starting position.
    #[must_use]
    pub fn initial() -> Self {
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Board::empty();
        for (col, &kind) in back.iter().enumerate() {
            let col = col as u8;
            board = board.with(Square::new(0, col), Some(Piece::new(Color::Black, kind)));
            board = board.with(
                Square::new(1, col),
                Some(Piece::new(Color::Black, PieceKind::Pawn)),
            );
            board = board.with(
                Square::new(6, col),
                Some(Piece::new(Color::White, PieceKind::Pawn)),
            );
            board = board.with(Square::new(7, col), Some(Piece::new(Color::White, kind)));
        }
        board
    }

    /// Piece at a square.
    #[must_use]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.cells[square.index()]
    }

    /// New board with one cell replaced.
    #[must_use]
    pub fn with(&self, square: Square, piece: Option<Piece>) -> Self {
        Self {
            cells: self.cells.update(square.index(), piece),
        }
    }

    fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.get(sq) == Some(Piece::new(color, PieceKind::King)))
    }
}

/// Castling availability flags, cleared permanently as kings and rooks move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    /// All rights lost; handy for constructing test positions.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }
}

/// A chess move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub is_castling: bool,
    pub is_en_passant: bool,
}

impl ChessMove {
    /// Plain move with no special flags.
    #[must_use]
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
            is_castling: false,
            is_en_passant: false,
        }
    }

    /// Promotion move.
    #[must_use]
    pub fn promoting(from: Square, to: Square, kind: PieceKind) -> Self {
        Self {
            promotion: Some(kind),
            ..Self::new(from, to)
        }
    }

    fn castling(from: Square, to: Square) -> Self {
        Self {
            is_castling: true,
            ..Self::new(from, to)
        }
    }

    fn en_passant(from: Square, to: Square) -> Self {
        Self {
            is_en_passant: true,
            ..Self::new(from, to)
        }
    }

    /// Display notation: `e2e4`, `e7e8q`, `O-O`, `O-O-O`.
    #[must_use]
    pub fn notation(&self) -> String {
        if self.is_castling {
            return if self.to.col() == 6 { "O-O" } else { "O-O-O" }.to_string();
        }
        match self.promotion {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind.letter()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

/// Immutable chess position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessState {
    pub board: Board,
    pub active_color: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove: u32,
}

impl ChessState {
    /// Standard starting position, White to move.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),
            active_color: Color::White,
            castling_rights: CastlingRights::default(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove: 1,
        }
    }

    /// All legal moves for the active color.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<ChessMove> {
        self.pseudo_legal_moves()
            .into_iter()
            .filter(|mv| !self.apply(mv).in_check(self.active_color))
            .collect()
    }

    /// Apply a move without validating membership in the legal set.
    ///
    /// Used internally and by search; the public engine entry point
    /// validates first.
    #[must_use]
    pub fn apply(&self, mv: &ChessMove) -> ChessState {
        let piece = self
            .board
            .get(mv.from)
            .expect("move must start on an occupied square");

        let mut captured = self.board.get(mv.to);
        let mut board = self.board.with(mv.from, None);

        if mv.is_en_passant {
            // The captured pawn sits beside the start square, not on the
            // destination.
            let captured_square = Square::new(mv.from.row(), mv.to.col());
            captured = board.get(captured_square);
            board = board.with(captured_square, None);
        }

        let is_castling = mv.is_castling
            || (piece.kind == PieceKind::King
                && (mv.to.col() as i8 - mv.from.col() as i8).abs() == 2);
        if is_castling {
            let (rook_from_col, rook_to_col) = if mv.to.col() > mv.from.col() {
                (7, 5)
            } else {
                (0, 3)
            };
            let rook_from = Square::new(mv.from.row(), rook_from_col);
            let rook_to = Square::new(mv.from.row(), rook_to_col);
            let rook = board.get(rook_from);
            board = board.with(rook_from, None);
            board = board.with(rook_to, rook);
        }

        let placed = match mv.promotion {
            Some(kind) => Piece::new(piece.color, kind),
            None => piece,
        };
        board = board.with(mv.to, Some(placed));

        let mut en_passant_target = None;
        if piece.kind == PieceKind::Pawn
            && (mv.to.row() as i8 - mv.from.row() as i8).abs() == 2
        {
            let skipped_row = (mv.from.row() + mv.to.row()) / 2;
            en_passant_target = Some(Square::new(skipped_row, mv.from.col()));
        }

        let halfmove_clock = if piece.kind == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock + 1
        };
        let fullmove = self.fullmove + u32::from(self.active_color == Color::Black);

        ChessState {
            board,
            active_color: self.active_color.opponent(),
            castling_rights: self.next_castling_rights(piece, captured, mv),
            en_passant_target,
            halfmove_clock,
            fullmove,
        }
    }

    /// Terminal classification: checkmate, stalemate, or ongoing.
    #[must_use]
    pub fn status(&self) -> TerminalStatus {
        if !self.legal_moves().is_empty() {
            return TerminalStatus::ongoing();
        }
        if self.in_check(self.active_color) {
            TerminalStatus::won(self.active_color.opponent(), "checkmate")
        } else {
            TerminalStatus::drawn("stalemate")
        }
    }

    /// Whether `color`'s king is attacked.
    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        match self.board.find_king(color) {
            Some(king) => self.is_square_attacked(king, color.opponent()),
            None => false,
        }
    }

    /// Whether `by_color` attacks `square`: pawn patterns, knight offsets,
    /// sliding rays, and adjacent kings.
    #[must_use]
    pub fn is_square_attacked(&self, square: Square, by_color: Color) -> bool {
        // A pawn of `by_color` attacks from the rank it advances out of.
        let pawn_dr = if by_color == Color::White { 1 } else { -1 };
        for dc in [-1, 1] {
            if let Some(from) = square.offset(pawn_dr, dc) {
                if self.board.get(from) == Some(Piece::new(by_color, PieceKind::Pawn)) {
                    return true;
                }
            }
        }

        for (dr, dc) in KNIGHT_OFFSETS {
            if let Some(from) = square.offset(dr, dc) {
                if self.board.get(from) == Some(Piece::new(by_color, PieceKind::Knight)) {
                    return true;
                }
            }
        }

        if self.attacked_on_lines(
            square,
            by_color,
            &ROOK_DIRECTIONS,
            &[PieceKind::Rook, PieceKind::Queen],
        ) {
            return true;
        }
        if self.attacked_on_lines(
            square,
            by_color,
            &BISHOP_DIRECTIONS,
            &[PieceKind::Bishop, PieceKind::Queen],
        ) {
            return true;
        }

        for (dr, dc) in QUEEN_DIRECTIONS {
            if let Some(from) = square.offset(dr, dc) {
                if self.board.get(from) == Some(Piece::new(by_color, PieceKind::King)) {
                    return true;
                }
            }
        }

        false
    }

    /// Same position with the other side to move; used by the AI's mobility
    /// term. The en-passant target is kept as-is.
    #[must_use]
    pub fn with_active_color(&self, color: Color) -> ChessState {
        ChessState {
            active_color: color,
            ..self.clone()
        }
    }

    /// Human-readable board with rank/file labels and a check notice.
    #[must_use]
    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = (0..8u8)
            .map(|row| {
                (0..8u8)
                    .map(|col| match self.board.get(Square::new(row, col)) {
                        Some(piece) => piece.symbol().to_string(),
                        None => ".".to_string(),
                    })
                    .collect()
            })
            .collect();
        let row_labels: Vec<String> = (1..=8).rev().map(|rank| rank.to_string()).collect();
        let grid = render_grid(&cells, &row_labels, &alphabetic_labels(8, true), 1, 1);

        let mut lines = vec![format!("Turn: {}", self.active_color), grid];
        if self.in_check(self.active_color) {
            lines.push(format!("{} is in check.", self.active_color));
        }
        lines.join("\n")
    }

    fn pseudo_legal_moves(&self) -> Vec<ChessMove> {
        let mut moves = Vec::new();
        for from in Square::all() {
            let Some(piece) = self.board.get(from) else {
                continue;
            };
            if piece.color != self.active_color {
                continue;
            }
            match piece.kind {
                PieceKind::Pawn => self.pawn_moves(from, piece, &mut moves),
                PieceKind::Knight => self.knight_moves(from, piece, &mut moves),
                PieceKind::Bishop => {
                    self.slider_moves(from, piece, &BISHOP_DIRECTIONS, &mut moves);
                }
                PieceKind::Rook => self.slider_moves(from, piece, &ROOK_DIRECTIONS, &mut moves),
                PieceKind::Queen => self.slider_moves(from, piece, &QUEEN_DIRECTIONS, &mut moves),
                PieceKind::King => self.king_moves(from, piece, &mut moves),
            }
        }
        moves
    }

    fn pawn_moves(&self, from: Square, piece: Piece, moves: &mut Vec<ChessMove>) {
        let direction: i8 = if piece.color == Color::White { -1 } else { 1 };
        let start_row = if piece.color == Color::White { 6 } else { 1 };
        let promotion_row = if piece.color == Color::White { 0 } else { 7 };

        if let Some(one_step) = from.offset(direction, 0) {
            if self.board.get(one_step).is_none() {
                if one_step.row() == promotion_row {
                    moves.extend(
                        PROMOTION_KINDS
                            .iter()
                            .map(|&kind| ChessMove::promoting(from, one_step, kind)),
                    );
                } else {
                    moves.push(ChessMove::new(from, one_step));
                }
                if from.row() == start_row {
                    if let Some(two_step) = from.offset(2 * direction, 0) {
                        if self.board.get(two_step).is_none() {
                            moves.push(ChessMove::new(from, two_step));
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            let Some(target) = from.offset(direction, dc) else {
                continue;
            };
            if let Some(occupant) = self.board.get(target) {
                if occupant.color != piece.color {
                    if target.row() == promotion_row {
                        moves.extend(
                            PROMOTION_KINDS
                                .iter()
                                .map(|&kind| ChessMove::promoting(from, target, kind)),
                        );
                    } else {
                        moves.push(ChessMove::new(from, target));
                    }
                }
            }
            if self.en_passant_target == Some(target) {
                moves.push(ChessMove::en_passant(from, target));
            }
        }
    }

    fn knight_moves(&self, from: Square, piece: Piece, moves: &mut Vec<ChessMove>) {
        for (dr, dc) in KNIGHT_OFFSETS {
            let Some(target) = from.offset(dr, dc) else {
                continue;
            };
            if self.board.get(target).map_or(true, |p| p.color != piece.color) {
                moves.push(ChessMove::new(from, target));
            }
        }
    }

    fn slider_moves(
        &self,
        from: Square,
        piece: Piece,
        directions: &[(i8, i8)],
        moves: &mut Vec<ChessMove>,
    ) {
        for &(dr, dc) in directions {
            let mut step = 1;
            while let Some(target) = from.offset(dr * step, dc * step) {
                match self.board.get(target) {
                    None => moves.push(ChessMove::new(from, target)),
                    Some(occupant) => {
                        if occupant.color != piece.color {
                            moves.push(ChessMove::new(from, target));
                        }
                        break;
                    }
                }
                step += 1;
            }
        }
    }

    fn king_moves(&self, from: Square, piece: Piece, moves: &mut Vec<ChessMove>) {
        for (dr, dc) in QUEEN_DIRECTIONS {
            let Some(target) = from.offset(dr, dc) else {
                continue;
            };
            if self.board.get(target).map_or(true, |p| p.color != piece.color) {
                moves.push(ChessMove::new(from, target));
            }
        }
        self.castle_moves(from, piece, moves);
    }

    fn castle_moves(&self, from: Square, piece: Piece, moves: &mut Vec<ChessMove>) {
        let home = if piece.color == Color::White {
            Square::new(7, 4)
        } else {
            Square::new(0, 4)
        };
        if from != home || self.in_check(piece.color) {
            return;
        }

        let (kingside_right, queenside_right) = match piece.color {
            Color::White => (
                self.castling_rights.white_kingside,
                self.castling_rights.white_queenside,
            ),
            Color::Black => (
                self.castling_rights.black_kingside,
                self.castling_rights.black_queenside,
            ),
        };
        let row = from.row();

        if kingside_right && self.can_castle_kingside(row, piece.color) {
            moves.push(ChessMove::castling(from, Square::new(row, 6)));
        }
        if queenside_right && self.can_castle_queenside(row, piece.color) {
            moves.push(ChessMove::castling(from, Square::new(row, 2)));
        }
    }

    fn can_castle_kingside(&self, row: u8, color: Color) -> bool {
        if self.board.get(Square::new(row, 7)) != Some(Piece::new(color, PieceKind::Rook)) {
            return false;
        }
        let path = [Square::new(row, 5), Square::new(row, 6)];
        if path.iter().any(|&sq| self.board.get(sq).is_some()) {
            return false;
        }
        let opponent = color.opponent();
        [Square::new(row, 4), Square::new(row, 5), Square::new(row, 6)]
            .iter()
            .all(|&sq| !self.is_square_attacked(sq, opponent))
    }

    fn can_castle_queenside(&self, row: u8, color: Color) -> bool {
        if self.board.get(Square::new(row, 0)) != Some(Piece::new(color, PieceKind::Rook)) {
            return false;
        }
        let path = [Square::new(row, 3), Square::new(row, 2), Square::new(row, 1)];
        if path.iter().any(|&sq| self.board.get(sq).is_some()) {
            return false;
        }
        let opponent = color.opponent();
        [Square::new(row, 4), Square::new(row, 3), Square::new(row, 2)]
            .iter()
            .all(|&sq| !self.is_square_attacked(sq, opponent))
    }

    fn next_castling_rights(
        &self,
        moved: Piece,
        captured: Option<Piece>,
        mv: &ChessMove,
    ) -> CastlingRights {
        let mut rights = self.castling_rights;

        if moved.kind == PieceKind::King {
            match moved.color {
                Color::White => {
                    rights.white_kingside = false;
                    rights.white_queenside = false;
                }
                Color::Black => {
                    rights.black_kingside = false;
                    rights.black_queenside = false;
                }
            }
        }

        if moved.kind == PieceKind::Rook {
            match (moved.color, mv.from.row(), mv.from.col()) {
                (Color::White, 7, 7) => rights.white_kingside = false,
                (Color::White, 7, 0) => rights.white_queenside = false,
                (Color::Black, 0, 7) => rights.black_kingside = false,
                (Color::Black, 0, 0) => rights.black_queenside = false,
                _ => {}
            }
        }

        if let Some(taken) = captured {
            if taken.kind == PieceKind::Rook {
                match (taken.color, mv.to.row(), mv.to.col()) {
                    (Color::White, 7, 7) => rights.white_kingside = false,
                    (Color::White, 7, 0) => rights.white_queenside = false,
                    (Color::Black, 0, 7) => rights.black_kingside = false,
                    (Color::Black, 0, 0) => rights.black_queenside = false,
                    _ => {}
                }
            }
        }

        rights
    }

    fn attacked_on_lines(
        &self,
        square: Square,
        by_color: Color,
        directions: &[(i8, i8)],
        attackers: &[PieceKind],
    ) -> bool {
        for &(dr, dc) in directions {
            let mut step = 1;
            while let Some(target) = square.offset(dr * step, dc * step) {
                if let Some(piece) = self.board.get(target) {
                    if piece.color == by_color && attackers.contains(&piece.kind) {
                        return true;
                    }
                    break;
                }
                step += 1;
            }
        }
        false
    }
}

/// Stateless chess engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChessEngine;

impl ChessEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GameEngine for ChessEngine {
    type State = ChessState;
    type Move = ChessMove;

    fn name(&self) -> &'static str {
        "Chess"
    }

    fn new_game(&mut self) -> ChessState {
        ChessState::initial()
    }

    fn legal_moves(&self, state: &ChessState) -> Vec<ChessMove> {
        state.legal_moves()
    }

    fn apply_move(&mut self, state: &ChessState, mv: &ChessMove) -> Result<ChessState, RulesError> {
        if !state.legal_moves().contains(mv) {
            return Err(RulesError::IllegalMove);
        }
        Ok(state.apply(mv))
    }

    fn is_terminal(&self, state: &ChessState) -> TerminalStatus {
        state.status()
    }

    fn render(&self, state: &ChessState) -> String {
        state.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(coord: &str) -> Square {
        Square::from_algebraic(coord).unwrap()
    }

    #[test]
    fn test_initial_board_layout() {
        let board = Board::initial();
        assert_eq!(
            board.get(sq("e1")),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            board.get(sq("d8")),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert_eq!(board.get(sq("e4")), None);
        let pawns = Square::all()
            .filter(|&s| board.get(s).map(|p| p.kind) == Some(PieceKind::Pawn))
            .count();
        assert_eq!(pawns, 16);
    }

    #[test]
    fn test_double_push_sets_en_passant_target() {
        let state = ChessState::initial();
        let mv = ChessMove::new(sq("e2"), sq("e4"));
        let next = state.apply(&mv);
        assert_eq!(next.en_passant_target, Some(sq("e3")));
        assert_eq!(next.active_color, Color::Black);
        assert_eq!(next.halfmove_clock, 0);
        assert_eq!(next.fullmove, 1);
    }

    #[test]
    fn test_fullmove_increments_after_black() {
        let state = ChessState::initial();
        let after_white = state.apply(&ChessMove::new(sq("g1"), sq("f3")));
        assert_eq!(after_white.fullmove, 1);
        assert_eq!(after_white.halfmove_clock, 1);
        let after_black = after_white.apply(&ChessMove::new(sq("b8"), sq("c6")));
        assert_eq!(after_black.fullmove, 2);
        assert_eq!(after_black.halfmove_clock, 2);
    }

    #[test]
    fn test_capture_resets_halfmove_clock() {
        let mut state = ChessState::initial();
        for (from, to) in [("g1", "f3"), ("b8", "c6"), ("f3", "d4")] {
            state = state.apply(&ChessMove::new(sq(from), sq(to)));
        }
        assert_eq!(state.halfmove_clock, 3);
        state = state.apply(&ChessMove::new(sq("c6"), sq("d4")));
        assert_eq!(state.halfmove_clock, 0);
    }

    #[test]
    fn test_castling_relocates_rook() {
        let board = Board::empty()
            .with(sq("e1"), Some(Piece::new(Color::White, PieceKind::King)))
            .with(sq("h1"), Some(Piece::new(Color::White, PieceKind::Rook)))
            .with(sq("e8"), Some(Piece::new(Color::Black, PieceKind::King)));
        let state = ChessState {
            board,
            active_color: Color::White,
            castling_rights: CastlingRights {
                white_kingside: true,
                white_queenside: false,
                black_kingside: false,
                black_queenside: false,
            },
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove: 1,
        };
        let castle = state
            .legal_moves()
            .into_iter()
            .find(|mv| mv.is_castling)
            .expect("kingside castle should be legal");
        let next = state.apply(&castle);
        assert_eq!(
            next.board.get(sq("g1")),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            next.board.get(sq("f1")),
            Some(Piece::new(Color::White, PieceKind::Rook))
        );
        assert_eq!(next.board.get(sq("h1")), None);
        assert!(!next.castling_rights.white_kingside);
    }

    #[test]
    fn test_castling_denied_by_attack_or_occupancy() {
        let board = Board::empty()
            .with(sq("e1"), Some(Piece::new(Color::White, PieceKind::King)))
            .with(sq("a1"), Some(Piece::new(Color::White, PieceKind::Rook)))
            .with(sq("h1"), Some(Piece::new(Color::White, PieceKind::Rook)))
            .with(sq("e8"), Some(Piece::new(Color::Black, PieceKind::King)));
        let state = ChessState {
            board,
            active_color: Color::White,
            castling_rights: CastlingRights::default(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove: 1,
        };
        let castles = |state: &ChessState| {
            state
                .legal_moves()
                .into_iter()
                .filter(|mv| mv.is_castling)
                .map(|mv| mv.notation())
                .collect::<Vec<_>>()
        };

        // Clear board: both ends are available.
        assert_eq!(castles(&state), vec!["O-O", "O-O-O"]);

        // A Black rook on f8 attacks the kingside transit square f1.
        let attacked = ChessState {
            board: state
                .board
                .with(sq("f8"), Some(Piece::new(Color::Black, PieceKind::Rook))),
            ..state.clone()
        };
        assert_eq!(castles(&attacked), vec!["O-O-O"]);

        // A knight on b1 blocks the queenside path.
        let blocked = ChessState {
            board: state
                .board
                .with(sq("b1"), Some(Piece::new(Color::White, PieceKind::Knight))),
            ..state.clone()
        };
        assert_eq!(castles(&blocked), vec!["O-O"]);
    }

    #[test]
    fn test_rook_capture_clears_opponent_right() {
        let board = Board::empty()
            .with(sq("e1"), Some(Piece::new(Color::White, PieceKind::King)))
            .with(sq("e8"), Some(Piece::new(Color::Black, PieceKind::King)))
            .with(sq("h8"), Some(Piece::new(Color::Black, PieceKind::Rook)))
            .with(sq("h1"), Some(Piece::new(Color::White, PieceKind::Rook)));
        let state = ChessState {
            board,
            active_color: Color::White,
            castling_rights: CastlingRights::default(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove: 1,
        };
        let next = state.apply(&ChessMove::new(sq("h1"), sq("h8")));
        assert!(!next.castling_rights.black_kingside);
        assert!(!next.castling_rights.white_kingside);
        assert!(next.castling_rights.black_queenside);
    }

    #[test]
    fn test_promotion_replaces_pawn() {
        let board = Board::empty()
            .with(sq("a7"), Some(Piece::new(Color::White, PieceKind::Pawn)))
            .with(sq("e1"), Some(Piece::new(Color::White, PieceKind::King)))
            .with(sq("e8"), Some(Piece::new(Color::Black, PieceKind::King)));
        let state = ChessState {
            board,
            active_color: Color::White,
            castling_rights: CastlingRights::none(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove: 1,
        };
        let promotions: Vec<_> = state
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.promotion.is_some())
            .collect();
        assert_eq!(promotions.len(), 4);

        let next = state.apply(&ChessMove::promoting(sq("a7"), sq("a8"), PieceKind::Knight));
        assert_eq!(
            next.board.get(sq("a8")),
            Some(Piece::new(Color::White, PieceKind::Knight))
        );
    }

    #[test]
    fn test_engine_rejects_illegal_move() {
        let mut engine = ChessEngine::new();
        let state = engine.new_game();
        let illegal = ChessMove::new(sq("e2"), sq("e5"));
        assert_eq!(
            engine.apply_move(&state, &illegal),
            Err(RulesError::IllegalMove)
        );
    }

    #[test]
    fn test_render_mentions_turn() {
        let state = ChessState::initial();
        let text = state.render();
        assert!(text.contains("Turn: White"));
        assert!(text.contains('K'));
    }
}
