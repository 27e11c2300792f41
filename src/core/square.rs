//! 8x8 board coordinates for chess and checkers.
//!
//! Rows are counted from the top of the rendered board: row 0 is rank 8
//! (Black's back rank), row 7 is rank 1. Columns run a-h left to right.

use serde::{Deserialize, Serialize};

const FILES: &[u8; 8] = b"abcdefgh";

/// A cell on an 8x8 board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Create a square. Panics if either coordinate is out of range.
    #[must_use]
    pub fn new(row: u8, col: u8) -> Self {
        assert!(row < 8 && col < 8, "square out of bounds");
        Self { row, col }
    }

    /// Row index (0 = rank 8).
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Column index (0 = file a).
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Flat 0..64 index, row-major.
    #[must_use]
    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    /// Shift by a (row, col) delta, returning `None` off the board.
    #[must_use]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Iterate every square in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
    }

    /// Parse an algebraic coordinate such as `e4`.
    #[must_use]
    pub fn from_algebraic(coord: &str) -> Option<Square> {
        let bytes = coord.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Some(Square {
            row: 7 - (rank - b'1'),
            col: file - b'a',
        })
    }

    /// Render as an algebraic coordinate such as `e4`.
    #[must_use]
    pub fn to_algebraic(self) -> String {
        let file = FILES[self.col as usize] as char;
        let rank = (8 - self.row) as u32;
        format!("{file}{rank}")
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algebraic_round_trip() {
        for sq in Square::all() {
            assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Some(sq));
        }
    }

    #[test]
    fn test_known_coordinates() {
        assert_eq!(Square::from_algebraic("a1"), Some(Square::new(7, 0)));
        assert_eq!(Square::from_algebraic("h8"), Some(Square::new(0, 7)));
        assert_eq!(Square::new(6, 4).to_algebraic(), "e2");
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(Square::from_algebraic(""), None);
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("e22"), None);
    }

    #[test]
    fn test_offset_bounds() {
        let corner = Square::new(0, 0);
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(1, 1), Some(Square::new(1, 1)));
    }
}
